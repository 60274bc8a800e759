pub mod lowercase;
pub mod stop;
