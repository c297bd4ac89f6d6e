// Dashboard handlers (d100)
pub mod d100_sales_overview;
