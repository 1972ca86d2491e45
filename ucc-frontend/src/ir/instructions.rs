//! IR instructions and terminators
//!
//! A basic block holds a run of ordinary instructions and exactly one
//! terminator; the split into two enums makes that invariant
//! structural. Serialization follows the LLVM textual form.

use super::{IrType, Value};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Integer binary opcode
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum BinOp {
    Add,
    Sub,
    Mul,
    SDiv,
}

impl fmt::Display for BinOp {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            BinOp::Add => "add",
            BinOp::Sub => "sub",
            BinOp::Mul => "mul",
            BinOp::SDiv => "sdiv",
        };
        write!(f, "{}", s)
    }
}

/// Signed comparison predicate
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Predicate {
    Eq,
    Ne,
    Slt,
    Sle,
    Sgt,
    Sge,
}

impl fmt::Display for Predicate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Predicate::Eq => "eq",
            Predicate::Ne => "ne",
            Predicate::Slt => "slt",
            Predicate::Sle => "sle",
            Predicate::Sgt => "sgt",
            Predicate::Sge => "sge",
        };
        write!(f, "{}", s)
    }
}

/// A non-terminating instruction
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Instruction {
    /// Stack slot; `dest` has pointer type, the allocated type is its
    /// pointee
    Alloca { dest: Value },
    Load {
        dest: Value,
        addr: Value,
    },
    Store {
        value: Value,
        addr: Value,
    },
    Binary {
        op: BinOp,
        dest: Value,
        lhs: Value,
        rhs: Value,
    },
    Icmp {
        pred: Predicate,
        dest: Value,
        lhs: Value,
        rhs: Value,
    },
    Trunc {
        dest: Value,
        value: Value,
    },
    Sext {
        dest: Value,
        value: Value,
    },
    Zext {
        dest: Value,
        value: Value,
    },
    GetElementPtr {
        dest: Value,
        base: Value,
        indices: Vec<Value>,
    },
    /// `dest` is absent exactly when the callee returns void
    Call {
        dest: Option<Value>,
        callee: String,
        args: Vec<Value>,
    },
}

impl fmt::Display for Instruction {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Instruction::Alloca { dest } => {
                write!(f, "{} = alloca {}", dest, dest.ty().pointee())
            }
            Instruction::Load { dest, addr } => {
                write!(f, "{} = load {}, {} {}", dest, dest.ty(), addr.ty(), addr)
            }
            Instruction::Store { value, addr } => {
                write!(f, "store {} {}, {} {}", value.ty(), value, addr.ty(), addr)
            }
            Instruction::Binary { op, dest, lhs, rhs } => {
                write!(f, "{} = {} {} {}, {}", dest, op, lhs.ty(), lhs, rhs)
            }
            Instruction::Icmp {
                pred,
                dest,
                lhs,
                rhs,
            } => {
                write!(f, "{} = icmp {} {} {}, {}", dest, pred, lhs.ty(), lhs, rhs)
            }
            Instruction::Trunc { dest, value } => {
                write!(f, "{} = trunc {} {} to {}", dest, value.ty(), value, dest.ty())
            }
            Instruction::Sext { dest, value } => {
                write!(f, "{} = sext {} {} to {}", dest, value.ty(), value, dest.ty())
            }
            Instruction::Zext { dest, value } => {
                write!(f, "{} = zext {} {} to {}", dest, value.ty(), value, dest.ty())
            }
            Instruction::GetElementPtr {
                dest,
                base,
                indices,
            } => {
                write!(
                    f,
                    "{} = getelementptr {}, {} {}",
                    dest,
                    base.ty().pointee(),
                    base.ty(),
                    base
                )?;
                for index in indices {
                    write!(f, ", {} {}", index.ty(), index)?;
                }
                Ok(())
            }
            Instruction::Call { dest, callee, args } => {
                let ret = match dest {
                    Some(dest) => dest.ty().clone(),
                    None => IrType::Void,
                };
                if let Some(dest) = dest {
                    write!(f, "{} = ", dest)?;
                }
                write!(f, "call {} @{}(", ret, callee)?;
                for (i, arg) in args.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "{} {}", arg.ty(), arg)?;
                }
                write!(f, ")")
            }
        }
    }
}

/// A block terminator
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Terminator {
    Br {
        target: String,
    },
    CondBr {
        cond: Value,
        then_label: String,
        else_label: String,
    },
    Ret {
        value: Option<Value>,
    },
}

impl fmt::Display for Terminator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Terminator::Br { target } => write!(f, "br label %{}", target),
            Terminator::CondBr {
                cond,
                then_label,
                else_label,
            } => {
                write!(
                    f,
                    "br {} {}, label %{}, label %{}",
                    cond.ty(),
                    cond,
                    then_label,
                    else_label
                )
            }
            Terminator::Ret { value: Some(value) } => {
                write!(f, "ret {} {}", value.ty(), value)
            }
            Terminator::Ret { value: None } => write!(f, "ret void"),
        }
    }
}
