//! Hex text serialization of pixel, kernel and result tensors.
//!
//! All files are ASCII with one record group per `\n`-terminated line, no
//! header and no blank lines. Writers truncate and overwrite their target on
//! every call. Readers are strict: every line must have exactly the expected
//! number of hex digits and the file exactly the expected number of lines.

mod lines;
mod reader;
mod writer;

pub(crate) use lines::RecordLines;

pub use reader::{
    load_kernel_matrix, load_kernels, load_pixel_vector, load_pixels, load_results,
    read_kernel_matrix, read_kernels, read_pixel_vector, read_pixels, read_results,
};
pub use writer::{
    save_kernel_matrix, save_kernels, save_pixel_vector, save_pixels, save_results,
    write_kernel_matrix, write_kernels, write_pixel_vector, write_pixels, write_results,
};
