pub mod traits;

pub use traits::TaskRepository;
