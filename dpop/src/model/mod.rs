pub mod alg;
pub mod pem;
pub mod pk;
