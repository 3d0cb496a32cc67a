pub mod meditation;
