pub mod iter_datastructure;
