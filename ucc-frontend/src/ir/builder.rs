//! IR construction
//!
//! The builder owns one function under construction. Registers are
//! numbered in creation order across the whole function. Block labels
//! are uniqued from hints: the first `if.then` keeps the bare hint,
//! later ones get a numeric suffix. [`IrBuilder::finish`] prunes blocks
//! unreachable from the entry and checks that every surviving block is
//! terminated; violations are bugs in the caller and panic.

use super::{BasicBlock, BinOp, Function, Instruction, IrType, Predicate, Terminator, Value};
use log::trace;
use std::collections::{HashMap, HashSet, VecDeque};

/// Handle to a block owned by the builder
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BlockId(usize);

/// Builder for a single function body
#[derive(Debug)]
pub struct IrBuilder {
    name: String,
    params: Vec<(String, IrType)>,
    return_type: IrType,
    blocks: Vec<BasicBlock>,
    current: usize,
    next_reg: u32,
    label_counts: HashMap<String, u32>,
}

impl IrBuilder {
    pub fn new_function(name: &str, params: Vec<(String, IrType)>, return_type: IrType) -> Self {
        let mut builder = Self {
            name: name.to_string(),
            params,
            return_type,
            blocks: Vec::new(),
            current: 0,
            next_reg: 0,
            label_counts: HashMap::new(),
        };
        builder.new_block("entry");
        builder
    }

    pub fn new_block(&mut self, hint: &str) -> BlockId {
        let count = self.label_counts.entry(hint.to_string()).or_insert(0);
        let label = if *count == 0 {
            hint.to_string()
        } else {
            format!("{hint}{count}")
        };
        *count += 1;
        self.blocks.push(BasicBlock::new(label));
        BlockId(self.blocks.len() - 1)
    }

    pub fn set_current_block(&mut self, block: BlockId) {
        self.current = block.0;
    }

    pub fn label(&self, block: BlockId) -> &str {
        &self.blocks[block.0].label
    }

    /// Whether the current block already has a terminator
    pub fn is_terminated(&self) -> bool {
        self.blocks[self.current].is_terminated()
    }

    /// Whether the current block can be reached from the entry
    ///
    /// False for join blocks whose every predecessor already returned;
    /// such blocks are pruned by [`IrBuilder::finish`].
    pub fn is_current_reachable(&self) -> bool {
        self.reachable_indices().contains(&self.current)
    }

    pub fn new_reg(&mut self, ty: IrType) -> Value {
        let id = self.next_reg;
        self.next_reg += 1;
        Value::Reg { id, ty }
    }

    /// Allocate a stack slot in the entry block
    ///
    /// Slots always land in the entry block, even when the current
    /// block is elsewhere or the entry is already terminated.
    pub fn new_local(&mut self, ty: IrType) -> Value {
        let dest = self.new_reg(ty.pointer_to());
        self.blocks[0].instructions.push(Instruction::Alloca {
            dest: dest.clone(),
        });
        dest
    }

    pub fn emit(&mut self, inst: Instruction) {
        let block = &mut self.blocks[self.current];
        assert!(
            !block.is_terminated(),
            "emit into terminated block `{}`",
            block.label
        );
        block.instructions.push(inst);
    }

    pub fn set_terminator(&mut self, term: Terminator) {
        let block = &mut self.blocks[self.current];
        assert!(
            !block.is_terminated(),
            "block `{}` is already terminated",
            block.label
        );
        block.terminator = Some(term);
    }

    pub fn branch(&mut self, target: BlockId) {
        let target = self.blocks[target.0].label.clone();
        self.set_terminator(Terminator::Br { target });
    }

    pub fn cond_branch(&mut self, cond: Value, then_block: BlockId, else_block: BlockId) {
        let then_label = self.blocks[then_block.0].label.clone();
        let else_label = self.blocks[else_block.0].label.clone();
        self.set_terminator(Terminator::CondBr {
            cond,
            then_label,
            else_label,
        });
    }

    pub fn ret(&mut self, value: Option<Value>) {
        self.set_terminator(Terminator::Ret { value });
    }

    pub fn build_load(&mut self, addr: Value) -> Value {
        let dest = self.new_reg(addr.ty().pointee().clone());
        self.emit(Instruction::Load {
            dest: dest.clone(),
            addr,
        });
        dest
    }

    pub fn build_store(&mut self, value: Value, addr: Value) {
        self.emit(Instruction::Store { value, addr });
    }

    pub fn build_binary(&mut self, op: BinOp, lhs: Value, rhs: Value) -> Value {
        let dest = self.new_reg(lhs.ty().clone());
        self.emit(Instruction::Binary {
            op,
            dest: dest.clone(),
            lhs,
            rhs,
        });
        dest
    }

    pub fn build_compare(&mut self, pred: Predicate, lhs: Value, rhs: Value) -> Value {
        let dest = self.new_reg(IrType::I1);
        self.emit(Instruction::Icmp {
            pred,
            dest: dest.clone(),
            lhs,
            rhs,
        });
        dest
    }

    pub fn build_trunc(&mut self, value: Value, ty: IrType) -> Value {
        let dest = self.new_reg(ty);
        self.emit(Instruction::Trunc {
            dest: dest.clone(),
            value,
        });
        dest
    }

    pub fn build_sext(&mut self, value: Value, ty: IrType) -> Value {
        let dest = self.new_reg(ty);
        self.emit(Instruction::Sext {
            dest: dest.clone(),
            value,
        });
        dest
    }

    pub fn build_zext(&mut self, value: Value, ty: IrType) -> Value {
        let dest = self.new_reg(ty);
        self.emit(Instruction::Zext {
            dest: dest.clone(),
            value,
        });
        dest
    }

    /// Address computation; the first index steps through the base
    /// pointer, each further index steps into an array
    pub fn build_gep(&mut self, base: Value, indices: Vec<Value>) -> Value {
        let mut ty = base.ty().pointee().clone();
        for _ in indices.iter().skip(1) {
            ty = match ty {
                IrType::Array { elem, .. } => *elem,
                other => unreachable!("getelementptr cannot step into {other}"),
            };
        }
        let dest = self.new_reg(ty.pointer_to());
        self.emit(Instruction::GetElementPtr {
            dest: dest.clone(),
            base,
            indices,
        });
        dest
    }

    pub fn build_call(
        &mut self,
        callee: &str,
        args: Vec<Value>,
        return_type: IrType,
    ) -> Option<Value> {
        if return_type == IrType::Void {
            self.emit(Instruction::Call {
                dest: None,
                callee: callee.to_string(),
                args,
            });
            None
        } else {
            let dest = self.new_reg(return_type);
            self.emit(Instruction::Call {
                dest: Some(dest.clone()),
                callee: callee.to_string(),
                args,
            });
            Some(dest)
        }
    }

    /// Finalize the function
    ///
    /// Blocks unreachable from the entry are dropped. Every remaining
    /// block must be terminated.
    pub fn finish(mut self) -> Function {
        let reachable = self.reachable_indices();
        let mut blocks = Vec::new();
        for (i, block) in self.blocks.drain(..).enumerate() {
            if !reachable.contains(&i) {
                trace!("pruning unreachable block `{}`", block.label);
                continue;
            }
            assert!(
                block.is_terminated(),
                "block `{}` lacks a terminator",
                block.label
            );
            blocks.push(block);
        }
        Function {
            name: self.name,
            params: self.params,
            return_type: self.return_type,
            blocks,
        }
    }

    fn reachable_indices(&self) -> HashSet<usize> {
        let by_label: HashMap<&str, usize> = self
            .blocks
            .iter()
            .enumerate()
            .map(|(i, block)| (block.label.as_str(), i))
            .collect();
        let mut seen = HashSet::from([0]);
        let mut queue = VecDeque::from([0]);
        while let Some(i) = queue.pop_front() {
            let targets: Vec<&str> = match &self.blocks[i].terminator {
                Some(Terminator::Br { target }) => vec![target.as_str()],
                Some(Terminator::CondBr {
                    then_label,
                    else_label,
                    ..
                }) => vec![then_label.as_str(), else_label.as_str()],
                _ => Vec::new(),
            };
            for label in targets {
                let j = by_label[label];
                if seen.insert(j) {
                    queue.push_back(j);
                }
            }
        }
        seen
    }
}
