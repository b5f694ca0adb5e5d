pub mod cpu;

pub use cpu::ImageprocKernel;
