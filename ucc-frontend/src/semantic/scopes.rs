//! Nested lexical scopes
//!
//! The global frame is pushed once at analysis start and never popped.
//! A name may be declared at most once per frame; lookup walks from the
//! innermost frame outward, so nested declarations shadow outer ones.

use crate::ast::DeclId;
use std::collections::HashMap;

/// Stack of name-to-declaration frames
#[derive(Debug)]
pub struct ScopeStack {
    frames: Vec<HashMap<String, DeclId>>,
}

impl ScopeStack {
    pub fn new() -> Self {
        Self {
            frames: vec![HashMap::new()],
        }
    }

    pub fn enter_scope(&mut self) {
        self.frames.push(HashMap::new());
    }

    pub fn exit_scope(&mut self) {
        debug_assert!(self.frames.len() > 1, "global scope is never exited");
        self.frames.pop();
    }

    pub fn at_global_scope(&self) -> bool {
        self.frames.len() == 1
    }

    /// Bind `name` in the current frame
    ///
    /// Fails with the previously bound declaration if the name already
    /// exists in this frame.
    pub fn declare(&mut self, name: &str, decl: DeclId) -> Result<(), DeclId> {
        let frame = self
            .frames
            .last_mut()
            .expect("scope stack always has the global frame");
        if let Some(&previous) = frame.get(name) {
            return Err(previous);
        }
        frame.insert(name.to_string(), decl);
        Ok(())
    }

    /// Innermost-first lookup; the first match wins
    pub fn lookup(&self, name: &str) -> Option<DeclId> {
        self.frames
            .iter()
            .rev()
            .find_map(|frame| frame.get(name).copied())
    }
}

impl Default for ScopeStack {
    fn default() -> Self {
        Self::new()
    }
}
