pub mod augmenter;
