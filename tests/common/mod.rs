//! Host-side stand-ins for the board hardware
//!
//! `FakeRda5807m` models the tuner's register file closely enough to drive
//! the controller: indexed writes land in the register file, tune and seek
//! commands clear STC and set it again after a configurable number of status
//! polls. `FakeDelay` records requested delays instead of sleeping.

#![allow(dead_code)]

use std::cell::RefCell;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::i2c::{ErrorKind, ErrorType, I2c, NoAcknowledgeSource, Operation};

use fm_radio::config::TunerConfig;
use fm_radio::drivers::rda5807m::registers::{config, reg, status, tuning};
use fm_radio::Rda5807m;

/// Chip ID register contents of a real part
pub const CHIP_ID: u16 = 0x5804;

/// Simulated register file and command state
#[derive(Debug)]
pub struct ChipModel {
    /// Address the chip answers on
    pub address: u8,
    /// Chip answers at all
    pub present: bool,
    /// Every transaction fails with a bus error
    pub fail: bool,
    /// Transactions that read fail with a bus error; plain writes go through
    pub fail_reads: bool,
    /// Register file 0x00..=0x0F
    pub regs: [u16; 16],
    /// Decoded register writes in order
    pub writes: Vec<(u8, u16)>,
    /// Raw bytes of every write
    pub raw_writes: Vec<Vec<u8>>,
    /// Status polls before STC is raised; `None` never completes
    pub stc_after: Option<usize>,
    /// Channel a seek lands on
    pub seek_channel: u16,
    /// Raise SF along with STC when a seek completes
    pub seek_fails: bool,
    /// Reads that started at the status register
    pub status_reads: usize,
    /// Channel of the command in progress
    pub pending: Option<u16>,
    /// Status polls since the command started
    pub polls: usize,
    /// Register the next read starts at
    pub pointer: u8,
}

impl ChipModel {
    /// Chip at 0x11 that completes every command on the first poll
    pub fn new() -> Self {
        let mut regs = [0u16; 16];
        regs[usize::from(reg::CHIP_ID)] = CHIP_ID;
        Self {
            address: 0x11,
            present: true,
            fail: false,
            fail_reads: false,
            regs,
            writes: Vec::new(),
            raw_writes: Vec::new(),
            stc_after: Some(1),
            seek_channel: 0,
            seek_fails: false,
            status_reads: 0,
            pending: None,
            polls: 0,
            pointer: reg::STATUS,
        }
    }

    /// Register writes to one register, in order
    pub fn writes_to(&self, register: u8) -> Vec<u16> {
        self.writes
            .iter()
            .filter(|(r, _)| *r == register)
            .map(|(_, v)| *v)
            .collect()
    }

    /// Last value written to a register
    pub fn last_write(&self, register: u8) -> Option<u16> {
        self.writes_to(register).last().copied()
    }

    /// Set the channel reported in the status register
    pub fn set_status_channel(&mut self, channel: u16) {
        let word = &mut self.regs[usize::from(reg::STATUS)];
        *word = (*word & !status::READCHAN_MASK) | (channel & status::READCHAN_MASK);
    }

    /// Place an RDS group in 0x0C..=0x0F and raise RDSR
    pub fn load_rds(&mut self, blocks: [u16; 4]) {
        self.regs[usize::from(reg::RDS_A)..=usize::from(reg::RDS_D)].copy_from_slice(&blocks);
        self.regs[usize::from(reg::STATUS)] |= status::RDSR;
    }

    fn write(&mut self, bytes: &[u8]) {
        self.raw_writes.push(bytes.to_vec());
        match *bytes {
            [pointer] => self.pointer = pointer,
            [register, hi, lo, ..] => {
                let value = u16::from_be_bytes([hi, lo]);
                self.pointer = register;
                self.writes.push((register, value));
                if let Some(slot) = self.regs.get_mut(usize::from(register)) {
                    *slot = value;
                }
                self.command(register, value);
            }
            _ => {}
        }
    }

    fn command(&mut self, register: u8, value: u16) {
        let start = match register {
            r if r == reg::TUNING && value & tuning::TUNE != 0 => {
                Some((value >> tuning::CHAN_SHIFT) & tuning::CHAN_MASK)
            }
            r if r == reg::CONFIG && value & config::SEEK != 0 => Some(self.seek_channel),
            _ => None,
        };
        if let Some(channel) = start {
            self.pending = Some(channel);
            self.polls = 0;
            self.regs[usize::from(reg::STATUS)] &= !(status::STC | status::SF);
        }
    }

    fn read(&mut self, buf: &mut [u8]) {
        if self.pointer == reg::STATUS {
            self.status_reads += 1;
            self.poll();
        }
        for (i, pair) in buf.chunks_mut(2).enumerate() {
            let idx = (usize::from(self.pointer) + i) % self.regs.len();
            let bytes = self.regs[idx].to_be_bytes();
            pair.copy_from_slice(&bytes[..pair.len()]);
        }
    }

    fn poll(&mut self) {
        let Some(channel) = self.pending else {
            return;
        };
        self.polls += 1;
        if self.stc_after.is_some_and(|n| self.polls >= n) {
            let seeking = self.regs[usize::from(reg::CONFIG)] & config::SEEK != 0;
            self.set_status_channel(channel);
            self.regs[usize::from(reg::STATUS)] |= status::STC;
            if seeking && self.seek_fails {
                self.regs[usize::from(reg::STATUS)] |= status::SF;
            }
            self.pending = None;
        }
    }
}

impl Default for ChipModel {
    fn default() -> Self {
        Self::new()
    }
}

/// Bus handle onto a shared [`ChipModel`]
#[derive(Clone, Debug)]
pub struct FakeRda5807m {
    pub chip: Rc<RefCell<ChipModel>>,
}

impl FakeRda5807m {
    pub fn new(chip: ChipModel) -> Self {
        Self {
            chip: Rc::new(RefCell::new(chip)),
        }
    }
}

impl ErrorType for FakeRda5807m {
    type Error = ErrorKind;
}

impl I2c for FakeRda5807m {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        let mut chip = self.chip.borrow_mut();
        if chip.fail {
            return Err(ErrorKind::Bus);
        }
        let reads = operations
            .iter()
            .any(|op| matches!(op, Operation::Read(_)));
        if chip.fail_reads && reads {
            return Err(ErrorKind::Bus);
        }
        if !chip.present || address != chip.address {
            return Err(ErrorKind::NoAcknowledge(NoAcknowledgeSource::Address));
        }
        for op in operations {
            match op {
                Operation::Write(bytes) => chip.write(bytes),
                Operation::Read(buf) => chip.read(buf),
            }
        }
        Ok(())
    }
}

/// Bus that acknowledges every write and records it
#[derive(Clone, Debug, Default)]
pub struct RecordingI2c {
    pub writes: Rc<RefCell<Vec<(u8, Vec<u8>)>>>,
}

impl ErrorType for RecordingI2c {
    type Error = ErrorKind;
}

impl I2c for RecordingI2c {
    fn transaction(
        &mut self,
        address: u8,
        operations: &mut [Operation<'_>],
    ) -> Result<(), Self::Error> {
        for op in operations {
            match op {
                Operation::Write(bytes) => self.writes.borrow_mut().push((address, bytes.to_vec())),
                Operation::Read(buf) => buf.fill(0),
            }
        }
        Ok(())
    }
}

/// Requested delays, shared with the test
#[derive(Debug, Default)]
pub struct DelayLog {
    pub total_ns: u64,
    pub calls: usize,
}

impl DelayLog {
    pub fn total_ms(&self) -> u64 {
        self.total_ns / 1_000_000
    }
}

/// Delay source that only records what was asked of it
#[derive(Clone, Debug, Default)]
pub struct FakeDelay {
    pub log: Rc<RefCell<DelayLog>>,
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        let mut log = self.log.borrow_mut();
        log.total_ns += u64::from(ns);
        log.calls += 1;
    }

    fn delay_us(&mut self, us: u32) {
        let mut log = self.log.borrow_mut();
        log.total_ns += u64::from(us) * 1_000;
        log.calls += 1;
    }

    fn delay_ms(&mut self, ms: u32) {
        let mut log = self.log.borrow_mut();
        log.total_ns += u64::from(ms) * 1_000_000;
        log.calls += 1;
    }
}

/// Tuner driver on a fake bus, plus handles to inspect the fakes
pub struct Rig {
    pub radio: Rda5807m<FakeRda5807m, FakeDelay>,
    pub chip: Rc<RefCell<ChipModel>>,
    pub delay: Rc<RefCell<DelayLog>>,
}

impl Rig {
    /// Initialise a driver against `chip`, then forget the init traffic
    pub fn new(chip: ChipModel, config: TunerConfig) -> Self {
        let bus = FakeRda5807m::new(chip);
        let delay = FakeDelay::default();
        let chip = Rc::clone(&bus.chip);
        let log = Rc::clone(&delay.log);

        let radio = Rda5807m::new(bus, delay, config).expect("tuner init");

        chip.borrow_mut().writes.clear();
        chip.borrow_mut().raw_writes.clear();
        chip.borrow_mut().status_reads = 0;
        *log.borrow_mut() = DelayLog::default();

        Self {
            radio,
            chip,
            delay: log,
        }
    }

    /// Driver with default configuration on a well-behaved chip
    pub fn default_radio() -> Self {
        Self::new(ChipModel::new(), TunerConfig::default())
    }
}
