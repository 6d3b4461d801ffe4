pub mod criteria;
pub mod product;
