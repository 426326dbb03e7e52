pub mod agent_run;
pub mod case;
pub mod eval_output;
pub mod ground_truth;
pub mod pathology;
pub mod scores;
