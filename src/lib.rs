pub mod graph;
pub mod cust_error;
pub mod snark;
pub mod milp;
pub mod drdp_instance;
