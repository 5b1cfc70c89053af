//! Pairing of a user functor with its reduction operator
//!
//! The dispatch layer hands backends a single object owning both the body
//! and the join strategy, so per-piece state lives in one place. The fixed
//! operators are zero-sized and the pairing then costs exactly the functor;
//! comparator-bearing operators add their captured state and nothing else.

use crate::reducer::ReduceOp;

/// One dispatchable unit: the per-index body plus the operator that folds
/// its contributions.
#[derive(Debug, Clone)]
pub struct CombinedFunctorReducer<F, Op: ReduceOp> {
    functor: F,
    reducer: Op,
}

impl<F, Op: ReduceOp> CombinedFunctorReducer<F, Op> {
    pub fn new(functor: F, reducer: Op) -> Self {
        Self { functor, reducer }
    }

    pub fn functor(&self) -> &F {
        &self.functor
    }

    pub fn reducer(&self) -> &Op {
        &self.reducer
    }
}
