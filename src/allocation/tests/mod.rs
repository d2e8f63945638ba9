mod common;

mod weights;
