//! Programmable transaction model
//!
//! A minimal subset of Sui's `TransactionData` sufficient for red packet
//! calls. Serialized with BCS; enum variant indices follow the on-chain
//! layout, so variants are declared in chain order and `Command` (where only
//! a few variants are used) serializes with explicit indices.

use std::fmt;

use serde::ser::{SerializeTupleVariant, Serializer};
use serde::Serialize;

use crate::error::{RedPacketError, Result};
use crate::move_types::{AccountAddress, TypeTag};

/// Object ids share the 32-byte address space
pub type ObjectId = AccountAddress;

/// 32-byte object digest, BCS-encoded as a length-prefixed byte string
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct ObjectDigest(pub [u8; 32]);

impl ObjectDigest {
    /// Parse the base58 form returned by JSON-RPC
    pub fn from_base58(s: &str) -> Result<Self> {
        let bytes = bs58::decode(s)
            .into_vec()
            .map_err(|e| RedPacketError::data(format!("invalid object digest {}: {}", s, e)))?;
        let digest: [u8; 32] = bytes.try_into().map_err(|b: Vec<u8>| {
            RedPacketError::data(format!("object digest {} has {} bytes, expected 32", s, b.len()))
        })?;
        Ok(Self(digest))
    }
}

impl fmt::Debug for ObjectDigest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "ObjectDigest({})", bs58::encode(self.0).into_string())
    }
}

impl Serialize for ObjectDigest {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        serializer.serialize_bytes(&self.0)
    }
}

/// `(id, version, digest)` reference to an owned or immutable object
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub struct ObjectRef {
    pub object_id: ObjectId,
    pub version: u64,
    pub digest: ObjectDigest,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum ObjectArg {
    ImmOrOwnedObject(ObjectRef),
    SharedObject {
        id: ObjectId,
        initial_shared_version: u64,
        mutable: bool,
    },
}

/// A transaction input
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum CallArg {
    /// BCS bytes of a pure value
    Pure(Vec<u8>),
    Object(ObjectArg),
}

impl CallArg {
    pub fn pure<T: Serialize>(value: &T) -> Result<Self> {
        Ok(CallArg::Pure(bcs::to_bytes(value)?))
    }
}

/// Reference to a value available to a command
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Argument {
    GasCoin,
    Input(u16),
    Result(u16),
    NestedResult(u16, u16),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ProgrammableMoveCall {
    pub package: ObjectId,
    pub module: String,
    pub function: String,
    pub type_arguments: Vec<TypeTag>,
    pub arguments: Vec<Argument>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Command {
    MoveCall(Box<ProgrammableMoveCall>),
    SplitCoins(Argument, Vec<Argument>),
    MakeMoveVec(Option<TypeTag>, Vec<Argument>),
}

impl Command {
    const MOVE_CALL: u32 = 0;
    const SPLIT_COINS: u32 = 2;
    const MAKE_MOVE_VEC: u32 = 5;

    /// The move call this command makes, if any
    pub fn as_move_call(&self) -> Option<&ProgrammableMoveCall> {
        match self {
            Command::MoveCall(call) => Some(call.as_ref()),
            _ => None,
        }
    }
}

impl Serialize for Command {
    fn serialize<S: Serializer>(&self, serializer: S) -> std::result::Result<S::Ok, S::Error> {
        match self {
            Command::MoveCall(call) => {
                serializer.serialize_newtype_variant("Command", Self::MOVE_CALL, "MoveCall", call)
            }
            Command::SplitCoins(coin, amounts) => {
                let mut state =
                    serializer.serialize_tuple_variant("Command", Self::SPLIT_COINS, "SplitCoins", 2)?;
                state.serialize_field(coin)?;
                state.serialize_field(amounts)?;
                state.end()
            }
            Command::MakeMoveVec(ty, elements) => {
                let mut state = serializer.serialize_tuple_variant(
                    "Command",
                    Self::MAKE_MOVE_VEC,
                    "MakeMoveVec",
                    2,
                )?;
                state.serialize_field(ty)?;
                state.serialize_field(elements)?;
                state.end()
            }
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct ProgrammableTransaction {
    pub inputs: Vec<CallArg>,
    pub commands: Vec<Command>,
}

impl ProgrammableTransaction {
    /// Append an input and return the argument referring to it
    pub fn input(&mut self, arg: CallArg) -> Argument {
        self.inputs.push(arg);
        Argument::Input((self.inputs.len() - 1) as u16)
    }

    /// Append a command and return the argument referring to its result
    pub fn command(&mut self, command: Command) -> Argument {
        self.commands.push(command);
        Argument::Result((self.commands.len() - 1) as u16)
    }

    pub fn move_call(&self) -> Option<&ProgrammableMoveCall> {
        self.commands.iter().find_map(Command::as_move_call)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TransactionKind {
    ProgrammableTransaction(ProgrammableTransaction),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GasData {
    pub payment: Vec<ObjectRef>,
    pub owner: AccountAddress,
    pub price: u64,
    pub budget: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum TransactionExpiration {
    None,
    Epoch(u64),
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct TransactionDataV1 {
    pub kind: TransactionKind,
    pub sender: AccountAddress,
    pub gas_data: GasData,
    pub expiration: TransactionExpiration,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub enum TransactionData {
    V1(TransactionDataV1),
}

impl TransactionData {
    pub fn new_programmable(
        sender: AccountAddress,
        gas_payment: Vec<ObjectRef>,
        pt: ProgrammableTransaction,
        gas_budget: u64,
        gas_price: u64,
    ) -> Self {
        TransactionData::V1(TransactionDataV1 {
            kind: TransactionKind::ProgrammableTransaction(pt),
            sender,
            gas_data: GasData {
                payment: gas_payment,
                owner: sender,
                price: gas_price,
                budget: gas_budget,
            },
            expiration: TransactionExpiration::None,
        })
    }

    pub fn programmable(&self) -> &ProgrammableTransaction {
        let TransactionData::V1(data) = self;
        let TransactionKind::ProgrammableTransaction(pt) = &data.kind;
        pt
    }

    pub fn gas_data(&self) -> &GasData {
        let TransactionData::V1(data) = self;
        &data.gas_data
    }

    /// BCS bytes as submitted to the node
    pub fn to_bytes(&self) -> Result<Vec<u8>> {
        Ok(bcs::to_bytes(self)?)
    }
}
