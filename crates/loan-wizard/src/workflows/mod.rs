pub mod loan_application;
