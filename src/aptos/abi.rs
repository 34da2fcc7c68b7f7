//! Entry function descriptors and BCS payload encoding
//!
//! Each red packet deployment exposes `create`, `open` and `close` entry
//! functions under `<address>::red_packet`. The descriptors are built from
//! fixed signature templates with the deployment address filled in, and
//! type-check arguments before encoding.

use serde::Serialize;

use crate::config::AptosSchema;
use crate::error::{RedPacketError, Result};
use crate::move_types::{AccountAddress, TypeTag};

/// Module holding the red packet entry functions
pub const MODULE_NAME: &str = "red_packet";

/// `TransactionPayload::EntryFunction` variant index
const ENTRY_FUNCTION_PAYLOAD_TAG: u8 = 2;

/// Argument types used by the red packet entry functions
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ArgType {
    U64,
    Address,
    VectorAddress,
    VectorU64,
}

/// A typed entry function argument
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum MoveValue {
    U64(u64),
    Address(AccountAddress),
    VectorAddress(Vec<AccountAddress>),
    VectorU64(Vec<u64>),
}

impl MoveValue {
    pub fn arg_type(&self) -> ArgType {
        match self {
            MoveValue::U64(_) => ArgType::U64,
            MoveValue::Address(_) => ArgType::Address,
            MoveValue::VectorAddress(_) => ArgType::VectorAddress,
            MoveValue::VectorU64(_) => ArgType::VectorU64,
        }
    }

    pub fn to_bcs(&self) -> Result<Vec<u8>> {
        let bytes = match self {
            MoveValue::U64(v) => bcs::to_bytes(v)?,
            MoveValue::Address(v) => bcs::to_bytes(v)?,
            MoveValue::VectorAddress(v) => bcs::to_bytes(v)?,
            MoveValue::VectorU64(v) => bcs::to_bytes(v)?,
        };
        Ok(bytes)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ModuleId {
    pub address: AccountAddress,
    pub name: String,
}

/// BCS body of an entry function payload
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct EntryFunction {
    pub module: ModuleId,
    pub function: String,
    pub ty_args: Vec<TypeTag>,
    pub args: Vec<Vec<u8>>,
}

impl EntryFunction {
    /// Canonical `TransactionPayload` bytes
    pub fn payload_bytes(&self) -> Result<Vec<u8>> {
        let mut out = vec![ENTRY_FUNCTION_PAYLOAD_TAG];
        out.extend(bcs::to_bytes(self)?);
        Ok(out)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ArgumentAbi {
    pub name: &'static str,
    pub ty: ArgType,
}

/// Signature of one entry function
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EntryFunctionAbi {
    pub module: ModuleId,
    pub name: &'static str,
    pub ty_param_count: usize,
    pub args: Vec<ArgumentAbi>,
}

impl EntryFunctionAbi {
    /// `0x...::red_packet::create` style function id
    pub fn function_id(&self) -> String {
        format!("{}::{}::{}", self.module.address, self.module.name, self.name)
    }

    /// Type-check `args` against the signature and build the payload body
    pub fn encode(&self, ty_args: Vec<TypeTag>, args: &[MoveValue]) -> Result<EntryFunction> {
        if ty_args.len() != self.ty_param_count {
            return Err(RedPacketError::Encode(format!(
                "{} expects {} type arguments, got {}",
                self.name,
                self.ty_param_count,
                ty_args.len()
            )));
        }
        if args.len() != self.args.len() {
            return Err(RedPacketError::Encode(format!(
                "{} expects {} arguments, got {}",
                self.name,
                self.args.len(),
                args.len()
            )));
        }
        for (abi, value) in self.args.iter().zip(args) {
            if abi.ty != value.arg_type() {
                return Err(RedPacketError::Encode(format!(
                    "{} argument {} expects {:?}, got {:?}",
                    self.name,
                    abi.name,
                    abi.ty,
                    value.arg_type()
                )));
            }
        }

        Ok(EntryFunction {
            module: self.module.clone(),
            function: self.name.to_string(),
            ty_args,
            args: args.iter().map(MoveValue::to_bcs).collect::<Result<_>>()?,
        })
    }
}

type FunctionTemplate = (&'static str, &'static [(&'static str, ArgType)]);

const LEGACY_TEMPLATES: [FunctionTemplate; 3] = [
    ("create", &[("count", ArgType::U64), ("total_balance", ArgType::U64)]),
    (
        "open",
        &[
            ("id", ArgType::U64),
            ("lucky_accounts", ArgType::VectorAddress),
            ("balances", ArgType::VectorU64),
        ],
    ),
    ("close", &[("id", ArgType::U64)]),
];

const HANDLER_TEMPLATES: [FunctionTemplate; 3] = [
    (
        "create",
        &[
            ("handler_index", ArgType::U64),
            ("count", ArgType::U64),
            ("total_balance", ArgType::U64),
        ],
    ),
    (
        "open",
        &[
            ("handler_index", ArgType::U64),
            ("id", ArgType::U64),
            ("lucky_accounts", ArgType::VectorAddress),
            ("balances", ArgType::VectorU64),
        ],
    ),
    (
        "close",
        &[("handler_index", ArgType::U64), ("id", ArgType::U64)],
    ),
];

/// The three entry functions of one red packet deployment
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RedPacketAbi {
    pub create: EntryFunctionAbi,
    pub open: EntryFunctionAbi,
    pub close: EntryFunctionAbi,
}

impl RedPacketAbi {
    pub fn new(address: AccountAddress, schema: AptosSchema) -> Self {
        let (templates, ty_param_count) = match schema {
            AptosSchema::Legacy => (&LEGACY_TEMPLATES, 0),
            // handler generation functions are generic over the coin type
            AptosSchema::Handler => (&HANDLER_TEMPLATES, 1),
        };
        let [create, open, close] = templates.map(|(name, args)| EntryFunctionAbi {
            module: ModuleId {
                address,
                name: MODULE_NAME.to_string(),
            },
            name,
            ty_param_count,
            args: args
                .iter()
                .map(|&(name, ty)| ArgumentAbi { name, ty })
                .collect(),
        });
        Self {
            create,
            open,
            close,
        }
    }
}
