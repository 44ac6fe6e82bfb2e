pub mod bw_converter;
