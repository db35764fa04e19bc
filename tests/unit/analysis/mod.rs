pub mod isophotes;
