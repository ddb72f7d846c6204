pub mod price;

pub use self::price::Dollars;
