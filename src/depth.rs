//! Nesting-depth guard: bounds combined table/array/inline-table recursion
//! so a pathological input fails with `NestingTooDeep` instead of
//! overflowing the call stack.
//!
//! An unbounded recursive-descent parser can take an extremely long time,
//! or blow the stack, on deeply nested arrays; this turns that into an
//! explicit, enforced bound rather than relying on the OS stack guard page.

use crate::error::{Error, Position, SemanticErrorKind};

/// Recommended maximum combined nesting depth.
pub const MAX_DEPTH: usize = 256;

pub struct DepthBudget {
    current: usize,
    max: usize,
}

impl DepthBudget {
    pub fn new(max: usize) -> Self {
        Self { current: 0, max }
    }

    /// Enters one more level of nesting, failing if the bound is exceeded.
    /// The returned guard restores the depth on drop.
    pub fn enter(&mut self, position: Position) -> Result<DepthGuard<'_>, Error> {
        if self.current >= self.max {
            return Err(Error::semantic(
                SemanticErrorKind::NestingTooDeep { max: self.max },
                position,
                "",
            ));
        }
        self.current += 1;
        Ok(DepthGuard { budget: self })
    }
}

impl Default for DepthBudget {
    fn default() -> Self {
        Self::new(MAX_DEPTH)
    }
}

pub struct DepthGuard<'a> {
    budget: &'a mut DepthBudget,
}

impl<'a> DepthGuard<'a> {
    /// Reborrows the underlying budget so a nested `enter` call can be made
    /// while this guard is still alive (and will restore depth on drop).
    pub fn budget(&mut self) -> &mut DepthBudget {
        self.budget
    }
}

impl Drop for DepthGuard<'_> {
    fn drop(&mut self) {
        self.budget.current -= 1;
    }
}
