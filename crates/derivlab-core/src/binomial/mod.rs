//! Recombining binomial option pricer.
//!
//! Pipeline: [`lattice::build_stock_lattice`] →
//! [`induction::risk_neutral_probability`] → [`payoff::terminal_payoff`] →
//! [`induction::backward_induction`] → [`tree::BinomialTree`]. Every stage is a
//! pure function of its inputs.

pub mod induction;
pub mod lattice;
pub mod payoff;
pub mod tree;

pub use lattice::Lattice;
pub use tree::{binomial_tree, price_binomial, BinomialInput, BinomialTree, NodeDetail, NodeIndex};
