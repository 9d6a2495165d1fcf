pub mod voteweb;
