pub mod mc_methods;
