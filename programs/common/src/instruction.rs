//! Instruction data codec
//!
//! Layout: one discriminator byte, then the instruction's arguments in
//! little-endian order. Readers bounds-check every field and fail with
//! `InvalidInstruction`; writers are used by off-chain clients.

use alloc::vec::Vec;

use crate::EscrowError;

/// Instruction discriminator
#[repr(u8)]
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum EscrowInstruction {
    /// Create the pool for a currency
    CreatePool = 0,
    /// Create the signer's maker record
    CreateMaker = 1,
    /// Open a (pool, maker) contribution
    CreateContribution = 2,
    /// Open the (pool, maker) ledger transaction
    CreateTransaction = 3,
    /// Mark a maker verified
    VerifyMaker = 4,
    /// Ledger deposit
    Deposit = 5,
    /// Ledger withdrawal
    Withdraw = 6,
    /// Escrow deposit opening an offer
    DepositFunds = 7,
    /// Settle an offer to a verified maker
    AcceptOffer = 8,
    /// Refund an offer to its taker
    CancelOffer = 9,
    /// Record the program config and verifier
    InitializeConfig = 10,
    /// Replace the configured verifier
    SetVerifier = 11,
}

impl TryFrom<u8> for EscrowInstruction {
    type Error = EscrowError;

    fn try_from(v: u8) -> Result<Self, Self::Error> {
        let ix = match v {
            0 => Self::CreatePool,
            1 => Self::CreateMaker,
            2 => Self::CreateContribution,
            3 => Self::CreateTransaction,
            4 => Self::VerifyMaker,
            5 => Self::Deposit,
            6 => Self::Withdraw,
            7 => Self::DepositFunds,
            8 => Self::AcceptOffer,
            9 => Self::CancelOffer,
            10 => Self::InitializeConfig,
            11 => Self::SetVerifier,
            _ => return Err(EscrowError::InvalidInstruction),
        };
        Ok(ix)
    }
}

/// Split instruction data into discriminator and argument bytes
pub fn split_instruction(data: &[u8]) -> Result<(EscrowInstruction, &[u8]), EscrowError> {
    let mut reader = InstructionReader::new(data);
    let ix = EscrowInstruction::try_from(reader.read_u8()?)?;
    Ok((ix, reader.rest()))
}

/// Read a u8 from instruction data
#[inline]
pub fn read_u8(data: &[u8], offset: usize) -> Result<u8, EscrowError> {
    data.get(offset).copied().ok_or(EscrowError::InvalidInstruction)
}

/// Read a u64 (little-endian) from instruction data
#[inline]
pub fn read_u64(data: &[u8], offset: usize) -> Result<u64, EscrowError> {
    Ok(u64::from_le_bytes(read_bytes::<8>(data, offset)?))
}

/// Read a fixed-size byte array from instruction data
#[inline]
pub fn read_bytes<const N: usize>(data: &[u8], offset: usize) -> Result<[u8; N], EscrowError> {
    let end = offset.checked_add(N).ok_or(EscrowError::InvalidInstruction)?;
    let slice = data.get(offset..end).ok_or(EscrowError::InvalidInstruction)?;
    let mut bytes = [0u8; N];
    bytes.copy_from_slice(slice);
    Ok(bytes)
}

/// Instruction data reader with tracked offset
pub struct InstructionReader<'a> {
    data: &'a [u8],
    offset: usize,
}

impl<'a> InstructionReader<'a> {
    #[inline]
    pub fn new(data: &'a [u8]) -> Self {
        Self { data, offset: 0 }
    }

    /// Unread bytes
    #[inline]
    pub fn rest(&self) -> &'a [u8] {
        self.data.get(self.offset..).unwrap_or(&[])
    }

    #[inline]
    pub fn read_u8(&mut self) -> Result<u8, EscrowError> {
        let val = read_u8(self.data, self.offset)?;
        self.offset += 1;
        Ok(val)
    }

    #[inline]
    pub fn read_u64(&mut self) -> Result<u64, EscrowError> {
        let val = read_u64(self.data, self.offset)?;
        self.offset += 8;
        Ok(val)
    }

    #[inline]
    pub fn read_bytes<const N: usize>(&mut self) -> Result<[u8; N], EscrowError> {
        let val = read_bytes(self.data, self.offset)?;
        self.offset += N;
        Ok(val)
    }
}

/// Instruction data writer, the inverse of [`InstructionReader`]
pub struct InstructionWriter {
    data: Vec<u8>,
}

impl InstructionWriter {
    pub fn new(ix: EscrowInstruction) -> Self {
        let mut data = Vec::with_capacity(32);
        data.push(ix as u8);
        Self { data }
    }

    pub fn u64(mut self, value: u64) -> Self {
        self.data.extend_from_slice(&value.to_le_bytes());
        self
    }

    pub fn bytes(mut self, value: &[u8]) -> Self {
        self.data.extend_from_slice(value);
        self
    }

    pub fn finish(self) -> Vec<u8> {
        self.data
    }
}

/// CreatePool arguments (11 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CreatePoolArgs {
    pub currency: [u8; 3],
    pub rate: u64,
}

impl CreatePoolArgs {
    pub fn unpack(data: &[u8]) -> Result<Self, EscrowError> {
        let mut reader = InstructionReader::new(data);
        Ok(Self {
            currency: reader.read_bytes::<3>()?,
            rate: reader.read_u64()?,
        })
    }

    pub fn pack(&self) -> Vec<u8> {
        InstructionWriter::new(EscrowInstruction::CreatePool)
            .bytes(&self.currency)
            .u64(self.rate)
            .finish()
    }
}

/// Deposit / Withdraw arguments (8 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct AmountArgs {
    pub amount: u64,
}

impl AmountArgs {
    pub fn unpack(data: &[u8]) -> Result<Self, EscrowError> {
        Ok(Self {
            amount: InstructionReader::new(data).read_u64()?,
        })
    }

    pub fn pack(&self, ix: EscrowInstruction) -> Vec<u8> {
        InstructionWriter::new(ix).u64(self.amount).finish()
    }
}

/// DepositFunds arguments (24 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DepositFundsArgs {
    pub amount: u64,
    pub exchange_rate: u64,
    pub nonce: u64,
}

impl DepositFundsArgs {
    pub fn unpack(data: &[u8]) -> Result<Self, EscrowError> {
        let mut reader = InstructionReader::new(data);
        Ok(Self {
            amount: reader.read_u64()?,
            exchange_rate: reader.read_u64()?,
            nonce: reader.read_u64()?,
        })
    }

    pub fn pack(&self) -> Vec<u8> {
        InstructionWriter::new(EscrowInstruction::DepositFunds)
            .u64(self.amount)
            .u64(self.exchange_rate)
            .u64(self.nonce)
            .finish()
    }
}

/// InitializeConfig / SetVerifier arguments (32 bytes)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct VerifierArgs {
    pub verifier: [u8; 32],
}

impl VerifierArgs {
    pub fn unpack(data: &[u8]) -> Result<Self, EscrowError> {
        Ok(Self {
            verifier: InstructionReader::new(data).read_bytes::<32>()?,
        })
    }

    pub fn pack(&self, ix: EscrowInstruction) -> Vec<u8> {
        InstructionWriter::new(ix).bytes(&self.verifier).finish()
    }
}

/// Data for argument-less instructions
pub fn pack_empty(ix: EscrowInstruction) -> Vec<u8> {
    InstructionWriter::new(ix).finish()
}
