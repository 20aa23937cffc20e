pub mod dgc;
