pub mod trigger_analysis;
