pub mod fpl;
