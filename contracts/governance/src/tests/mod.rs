pub mod proposal_test;
