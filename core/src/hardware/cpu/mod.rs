//! The LR35902 interpreter. Execution is budgeted per master cycle: when the
//! cycle counter runs dry the CPU fetches 32 bits at PC, decodes and executes
//! the whole instruction at once, then charges the table cost for it.

use log::*;

use crate::hardware::cpu::execute::JumpCondition;
use crate::hardware::cpu::registers::{Reg16, Registers};
use crate::hardware::cpu::traits::{SetU16, SetU8, ToU16, ToU8};
use crate::hardware::mmu::MemoryMapper;
use crate::io::interrupts::{Interrupt, InterruptFlags};
use crate::support::{high_byte, low_byte};
use crate::DebugSettings;

#[cfg(test)]
mod tests;

mod alu;
mod execute;
pub mod instructions;
pub mod registers;
mod traits;

pub use execute::{Operand8, Operand16};

/// An interrupt dispatch costs five M-cycles.
pub const INTERRUPT_SERVICE_CYCLES: u8 = 20;

#[derive(Debug)]
pub struct Cpu<M: MemoryMapper> {
    pub mmu: M,
    pub registers: Registers,
    /// Total master cycles ticked so far.
    pub cycles_performed: u64,
    /// Master cycles left before the next instruction may start.
    pub cycles_until_next_instr: u8,
    pub halted: bool,
    pub stopped: bool,
    ime: bool,
    delayed_ime: bool,
    opcode: u8,
    prefixed: bool,
    /// The two bytes following the current opcode, little endian.
    operand_word: u16,
    branch_taken: bool,
    debug: DebugSettings,
    last_written_address: Option<u16>,
}

impl<M: MemoryMapper> Cpu<M> {
    pub fn new(mmu: M, debug: DebugSettings) -> Self {
        let boot_rom_finished = mmu.boot_rom_finished();

        let mut result = Cpu {
            mmu,
            registers: Registers::new(),
            cycles_performed: 0,
            cycles_until_next_instr: 0,
            halted: false,
            stopped: false,
            ime: false,
            delayed_ime: false,
            opcode: 0,
            prefixed: false,
            operand_word: 0,
            branch_taken: false,
            debug,
            last_written_address: None,
        };

        if boot_rom_finished {
            // The register state the boot sequence leaves behind.
            result.registers.set_af(0x01B0);
            result.registers.set_bc(0x0013);
            result.registers.set_de(0x00D8);
            result.registers.set_hl(0x014D);
            result.registers.sp = 0xFFFE;
            result.registers.pc = 0x0100;
        }

        result
    }

    /// One master cycle: either pay down the current instruction's budget or
    /// run the next one (interrupt dispatch included) and start a new budget.
    pub fn tick(&mut self) {
        self.cycles_performed += 1;

        if self.cycles_until_next_instr > 0 {
            self.cycles_until_next_instr -= 1;
            return;
        }

        let cycles = self.advance();
        debug_assert!(cycles >= 1);
        self.cycles_until_next_instr = cycles - 1;
    }

    /// Whether any configured breakpoint matches the current CPU state.
    pub fn wants_break(&self) -> bool {
        if self.debug.break_on_pc == Some(self.registers.pc) {
            return true;
        }

        let opcode_break = if self.prefixed {
            self.debug.break_on_opcode_prefixed
        } else {
            self.debug.break_on_opcode
        };
        if opcode_break == Some(self.opcode) {
            return true;
        }

        self.debug.break_on_write_address.is_some()
            && self.debug.break_on_write_address == self.last_written_address
    }

    fn advance(&mut self) -> u8 {
        let pending = self.mmu.interrupt_flag() & self.mmu.interrupt_enable();

        if self.halted {
            // HALT wakes on any pending interrupt, enabled master flag or
            // not. Until then the core idles in M-cycle steps.
            if pending.is_empty() {
                return 4;
            }
            self.halted = false;
        }

        if self.stopped {
            return 4;
        }

        if self.ime && !pending.is_empty() {
            return self.service_interrupt(pending);
        }

        // EI arms IME only after the instruction following it.
        if self.delayed_ime {
            self.ime = true;
            self.delayed_ime = false;
        }

        self.execute_next()
    }

    fn service_interrupt(&mut self, pending: InterruptFlags) -> u8 {
        for interrupt in Interrupt::iter() {
            if pending.contains(interrupt.flag()) {
                debug!("Servicing {:?} interrupt", interrupt);
                self.mmu.clear_interrupt(interrupt);
                self.ime = false;
                self.push_helper(self.registers.pc);
                self.registers.pc = interrupt.vector();
                return INTERRUPT_SERVICE_CYCLES;
            }
        }

        unreachable!("a pending interrupt vanished mid dispatch")
    }

    /// Fetch, decode and execute one instruction, returning its cycle cost.
    fn execute_next(&mut self) -> u8 {
        let fetched = self.mmu.read_dword(self.registers.pc);
        let opcode = fetched as u8;

        if opcode == 0xCB {
            let prefixed_opcode = (fetched >> 8) as u8;
            let info = instructions::prefixed_info(prefixed_opcode);
            self.opcode = prefixed_opcode;
            self.prefixed = true;

            #[cfg(feature = "cpu-logging")]
            trace!(
                "Executing {:<12} - {}",
                info.mnemonic,
                self.registers
            );

            self.registers.pc = self.registers.pc.wrapping_add(u16::from(info.size));
            self.execute_prefix(prefixed_opcode);
            info.cycles
        } else {
            let info = &instructions::UNPREFIXED[opcode as usize];
            self.opcode = opcode;
            self.prefixed = false;
            self.operand_word = (fetched >> 8) as u16;
            self.branch_taken = false;

            #[cfg(feature = "cpu-logging")]
            trace!(
                "Executing {:<12} - {}",
                info.mnemonic,
                self.registers
            );

            self.registers.pc = self.registers.pc.wrapping_add(u16::from(info.size));
            self.execute(opcode);

            if self.branch_taken {
                info.cycles
            } else {
                info.cycles_not_taken
            }
        }
    }

    /// All CPU-originated writes go through here so write breakpoints see
    /// them.
    fn write_byte_traced(&mut self, address: u16, value: u8) {
        self.last_written_address = Some(address);
        self.mmu.write_byte(address, value);
    }

    fn write_short_traced(&mut self, address: u16, value: u16) {
        self.write_byte_traced(address, low_byte(value));
        self.write_byte_traced(address.wrapping_add(1), high_byte(value));
    }

    fn take_branch_if(&mut self, condition: JumpCondition) -> bool {
        let taken = match condition {
            JumpCondition::NotZero => !self.registers.zf(),
            JumpCondition::Zero => self.registers.zf(),
            JumpCondition::NotCarry => !self.registers.cf(),
            JumpCondition::Carry => self.registers.cf(),
            JumpCondition::Always => true,
        };

        if taken {
            self.branch_taken = true;
        }
        taken
    }

    fn nop(&mut self) {}

    /// `ld rr,nn` OR `ld (a16),SP`
    fn load_16bit<T: Copy, U: Copy>(&mut self, destination: T, source: U)
    where
        Self: SetU16<T>,
        Self: ToU16<U>,
    {
        let value = self.read_u16_value(source);
        self.set_u16_value(destination, value);
    }

    /// `ld` between any 8-bit operands; never touches flags.
    fn load_8bit<T: Copy, U: Copy>(&mut self, destination: T, source: U)
    where
        Self: SetU8<T>,
        Self: ToU8<U>,
    {
        let value = self.read_u8_value(source);
        self.set_u8_value(destination, value);
    }

    /// `r = r + 1` OR `(HL) = (HL) + 1`
    ///
    /// Flags: `z0h-`
    fn increment<T: Copy>(&mut self, target: T)
    where
        Self: ToU8<T>,
        Self: SetU8<T>,
    {
        let old_value = self.read_u8_value(target);
        let new_value = old_value.wrapping_add(1);

        self.registers.set_zf(new_value == 0);
        self.registers.set_n(false);
        self.registers.set_h((old_value & 0xF) + 0x1 > 0xF);

        self.set_u8_value(target, new_value);
    }

    /// `r = r - 1` OR `(HL) = (HL) - 1`
    ///
    /// Flags: `z1h-`
    fn decrement<T: Copy>(&mut self, target: T)
    where
        Self: ToU8<T>,
        Self: SetU8<T>,
    {
        let old_value = self.read_u8_value(target);
        let new_value = old_value.wrapping_sub(1);

        self.registers.set_zf(new_value == 0);
        self.registers.set_n(true);
        self.registers.set_h(old_value & 0xF == 0);

        self.set_u8_value(target, new_value);
    }

    /// `rr = rr + 1`, no flags.
    fn increment16(&mut self, target: Reg16) {
        let new_value = self.read_u16_value(target).wrapping_add(1);
        self.set_u16_value(target, new_value);
    }

    /// `rr = rr - 1`, no flags.
    fn decrement16(&mut self, target: Reg16) {
        let new_value = self.read_u16_value(target).wrapping_sub(1);
        self.set_u16_value(target, new_value);
    }

    /// `HL = HL + rr`
    ///
    /// Flags: `-0hc`, with the half carry out of bit 11.
    fn add16(&mut self, target: Reg16) {
        let value = self.read_u16_value(target);
        let hl = self.registers.hl();
        let (result, overflowed) = hl.overflowing_add(value);

        self.registers.set_n(false);
        self.registers.set_h((hl & 0x0FFF) + (value & 0x0FFF) > 0x0FFF);
        self.registers.set_cf(overflowed);

        self.registers.set_hl(result);
    }

    /// `ADD SP,e8`
    ///
    /// Flags: `00hc`, computed over the low byte of SP.
    fn add_sp(&mut self) {
        let value = self.operand_word as u8 as i8 as u16;
        let sp = self.registers.sp;

        self.registers.set_zf(false);
        self.registers.set_n(false);
        self.registers.set_h((sp & 0xF) + (value & 0xF) > 0xF);
        self.registers.set_cf((sp & 0xFF) + (value & 0xFF) > 0xFF);

        self.registers.sp = sp.wrapping_add(value);
    }

    /// `LD HL,SP+e8`
    ///
    /// Flags: `00hc`, same rules as `ADD SP,e8`.
    fn load_sp_i(&mut self) {
        let value = self.operand_word as u8 as i8 as u16;
        let sp = self.registers.sp;

        self.registers.set_zf(false);
        self.registers.set_n(false);
        self.registers.set_h((sp & 0xF) + (value & 0xF) > 0xF);
        self.registers.set_cf((sp & 0xFF) + (value & 0xFF) > 0xFF);

        self.registers.set_hl(sp.wrapping_add(value));
    }

    /// `LD SP,HL`
    fn load_sp_hl(&mut self) {
        self.registers.sp = self.registers.hl();
    }

    /// `A = A + value`
    ///
    /// Flags: `z0hc`
    fn add<T: Copy>(&mut self, target: T)
    where
        Self: ToU8<T>,
    {
        let value = self.read_u8_value(target);
        let (new_value, overflowed) = self.registers.a.overflowing_add(value);

        self.registers.set_zf(new_value == 0);
        self.registers.set_n(false);
        self.registers.set_h((self.registers.a & 0xF) + (value & 0xF) > 0xF);
        self.registers.set_cf(overflowed);

        self.registers.a = new_value;
    }

    /// `A = A + value + carry`
    ///
    /// Flags: `z0hc`
    fn adc<T: Copy>(&mut self, target: T)
    where
        Self: ToU8<T>,
    {
        let value = self.read_u8_value(target);
        let carry = self.registers.cf() as u8;
        let new_value = self.registers.a.wrapping_add(value).wrapping_add(carry);

        self.registers.set_zf(new_value == 0);
        self.registers.set_n(false);
        self.registers
            .set_h((self.registers.a & 0xF) + (value & 0xF) + carry > 0xF);
        self.registers
            .set_cf(u16::from(self.registers.a) + u16::from(value) + u16::from(carry) > 0xFF);

        self.registers.a = new_value;
    }

    /// `A = A - value`
    ///
    /// Flags: `z1hc`
    fn sub<T: Copy>(&mut self, target: T)
    where
        Self: ToU8<T>,
    {
        let value = self.read_u8_value(target);
        let new_value = self.registers.a.wrapping_sub(value);

        self.registers.set_zf(new_value == 0);
        self.registers.set_n(true);
        self.registers.set_h((self.registers.a & 0xF) < (value & 0xF));
        self.registers.set_cf(self.registers.a < value);

        self.registers.a = new_value;
    }

    /// `A = A - value - carry`
    ///
    /// Flags: `z1hc`
    fn sbc<T: Copy>(&mut self, target: T)
    where
        Self: ToU8<T>,
    {
        let value = self.read_u8_value(target);
        let carry = self.registers.cf() as u8;
        let new_value = self.registers.a.wrapping_sub(value).wrapping_sub(carry);

        self.registers.set_zf(new_value == 0);
        self.registers.set_n(true);
        self.registers.set_h(
            (self.registers.a & 0xF)
                .wrapping_sub(value & 0xF)
                .wrapping_sub(carry)
                & 0x10
                != 0,
        );
        self.registers
            .set_cf(u16::from(value) + u16::from(carry) > u16::from(self.registers.a));

        self.registers.a = new_value;
    }

    /// Flags: `z010`
    fn and<T: Copy>(&mut self, target: T)
    where
        Self: ToU8<T>,
    {
        self.registers.a &= self.read_u8_value(target);

        self.registers.set_zf(self.registers.a == 0);
        self.registers.set_n(false);
        self.registers.set_h(true);
        self.registers.set_cf(false);
    }

    /// Flags: `z000`
    fn xor<T: Copy>(&mut self, target: T)
    where
        Self: ToU8<T>,
    {
        self.registers.a ^= self.read_u8_value(target);

        self.registers.set_zf(self.registers.a == 0);
        self.registers.set_n(false);
        self.registers.set_h(false);
        self.registers.set_cf(false);
    }

    /// Flags: `z000`
    fn or<T: Copy>(&mut self, target: T)
    where
        Self: ToU8<T>,
    {
        self.registers.a |= self.read_u8_value(target);

        self.registers.set_zf(self.registers.a == 0);
        self.registers.set_n(false);
        self.registers.set_h(false);
        self.registers.set_cf(false);
    }

    /// `CP value`: subtraction flags without storing the result.
    ///
    /// Flags: `z1hc`
    fn compare<T: Copy>(&mut self, target: T)
    where
        Self: ToU8<T>,
    {
        let value = self.read_u8_value(target);
        let new_value = self.registers.a.wrapping_sub(value);

        self.registers.set_zf(new_value == 0);
        self.registers.set_n(true);
        self.registers.set_h((self.registers.a & 0xF) < (value & 0xF));
        self.registers.set_cf(self.registers.a < value);
    }

    /// Rotate A left; unlike the CB variant Z is always cleared.
    ///
    /// Flags: `000c`
    fn rlca(&mut self) {
        self.rotate_left(registers::Reg8::A);
        self.registers.set_zf(false);
    }

    /// Rotate A left through carry.
    ///
    /// Flags: `000c`
    fn rla(&mut self) {
        self.rotate_left_carry(registers::Reg8::A);
        self.registers.set_zf(false);
    }

    /// Rotate A right.
    ///
    /// Flags: `000c`
    fn rrca(&mut self) {
        self.rotate_right(registers::Reg8::A);
        self.registers.set_zf(false);
    }

    /// Rotate A right through carry.
    ///
    /// Flags: `000c`
    fn rra(&mut self) {
        self.rotate_right_carry(registers::Reg8::A);
        self.registers.set_zf(false);
    }

    /// Decimal adjust A after BCD arithmetic.
    ///
    /// Flags: `z-0c`
    fn daa(&mut self) {
        if !self.registers.n() {
            // After an addition, adjust if a (half-)carry occurred or the
            // result is out of BCD range.
            if self.registers.cf() || self.registers.a > 0x99 {
                self.registers.a = self.registers.a.wrapping_add(0x60);
                self.registers.set_cf(true);
            }
            if self.registers.hf() || (self.registers.a & 0x0F) > 0x09 {
                self.registers.a = self.registers.a.wrapping_add(0x06);
            }
        } else {
            // After a subtraction, only adjust if a (half-)carry occurred.
            if self.registers.cf() {
                self.registers.a = self.registers.a.wrapping_sub(0x60);
            }
            if self.registers.hf() {
                self.registers.a = self.registers.a.wrapping_sub(0x06);
            }
        }

        self.registers.set_zf(self.registers.a == 0);
        self.registers.set_h(false);
    }

    /// `A = !A`
    ///
    /// Flags: `-11-`
    fn cpl(&mut self) {
        self.registers.a = !self.registers.a;
        self.registers.set_n(true);
        self.registers.set_h(true);
    }

    /// Flags: `-001`
    fn scf(&mut self) {
        self.registers.set_n(false);
        self.registers.set_h(false);
        self.registers.set_cf(true);
    }

    /// Flags: `-00i` where `i` inverts the carry.
    fn ccf(&mut self) {
        self.registers.set_n(false);
        self.registers.set_h(false);
        self.registers.toggle_cf();
    }

    /// `jr cc,e8`: relative jump from the address after the operand.
    fn relative_jump(&mut self, condition: JumpCondition) {
        let offset = self.operand_word as u8 as i8;
        if self.take_branch_if(condition) {
            self.registers.pc = self.registers.pc.wrapping_add(offset as u16);
        }
    }

    /// `jp cc,a16`
    fn jump(&mut self, condition: JumpCondition) {
        let address = self.operand_word;
        if self.take_branch_if(condition) {
            self.registers.pc = address;
        }
    }

    /// `jp HL`
    fn jump_hl(&mut self) {
        self.registers.pc = self.registers.hl();
    }

    /// `call cc,a16`: pushes the address of the following instruction.
    fn call(&mut self, condition: JumpCondition) {
        let address = self.operand_word;
        if self.take_branch_if(condition) {
            self.push_helper(self.registers.pc);
            self.registers.pc = address;
        }
    }

    /// `ret cc`
    fn ret(&mut self, condition: JumpCondition) {
        if self.take_branch_if(condition) {
            self.registers.pc = self.pop_helper();
        }
    }

    /// `reti`: return and set IME immediately, without the EI delay.
    fn reti(&mut self) {
        self.registers.pc = self.pop_helper();
        self.ime = true;
    }

    /// `rst vec`: a one-byte call to a fixed vector.
    fn rst(&mut self, vector: u8) {
        self.push_helper(self.registers.pc);
        self.registers.pc = u16::from(vector);
    }

    fn push(&mut self, target: Reg16) {
        let value = self.read_u16_value(target);
        self.push_helper(value);
    }

    /// `pop rr`; popping into AF drops the low F nibble.
    fn pop(&mut self, target: Reg16) {
        let value = self.pop_helper();
        self.set_u16_value(target, value);
    }

    fn push_helper(&mut self, value: u16) {
        self.registers.sp = self.registers.sp.wrapping_sub(2);
        self.write_short_traced(self.registers.sp, value);
    }

    fn pop_helper(&mut self) -> u16 {
        let value = self.mmu.read_short(self.registers.sp);
        self.registers.sp = self.registers.sp.wrapping_add(2);
        value
    }

    /// `DI` clears IME at once and cancels a pending `EI`.
    fn di(&mut self) {
        self.ime = false;
        self.delayed_ime = false;
    }

    /// `EI` arms IME after the following instruction.
    fn ei(&mut self) {
        self.delayed_ime = true;
    }

    /// `HALT` idles the core until an interrupt becomes pending. The
    /// hardware's HALT bug (PC failing to advance when HALT is entered with
    /// IME clear and an interrupt already pending) is not modelled.
    fn halt(&mut self) {
        self.halted = true;
    }

    /// `STOP`: latched for the frontend; the core idles until it reacts.
    fn stop(&mut self) {
        info!("STOP requested at PC {:#06X}", self.registers.pc);
        self.stopped = true;
    }

    /// The holes in the opcode map have no defined behaviour.
    fn unknown(&mut self) {
        panic!("Executed an illegal opcode: {:#04X}", self.opcode);
    }

    /*
        Prefixed instructions
    */

    /// `RLC r8/[HL]`: C <- [7 <- 0] <- [7]
    ///
    /// Flags: `z00c`
    fn rlc<T: Copy>(&mut self, target: T)
    where
        Self: ToU8<T>,
        Self: SetU8<T>,
    {
        self.rotate_left(target);
    }

    /// `RRC r8/[HL]`: [0] -> [7 -> 0] -> C
    ///
    /// Flags: `z00c`
    fn rrc<T: Copy>(&mut self, target: T)
    where
        Self: ToU8<T>,
        Self: SetU8<T>,
    {
        self.rotate_right(target);
    }

    /// `RL r8/[HL]`: C <- [7 <- 0] <- C
    ///
    /// Flags: `z00c`
    fn rl<T: Copy>(&mut self, target: T)
    where
        Self: ToU8<T>,
        Self: SetU8<T>,
    {
        self.rotate_left_carry(target);
    }

    /// `RR r8/[HL]`: C -> [7 -> 0] -> C
    ///
    /// Flags: `z00c`
    fn rr<T: Copy>(&mut self, target: T)
    where
        Self: ToU8<T>,
        Self: SetU8<T>,
    {
        self.rotate_right_carry(target);
    }

    /// `SLA r8/[HL]`: C <- [7 <- 0] <- 0
    ///
    /// Flags: `z00c`
    fn sla<T: Copy>(&mut self, target: T)
    where
        Self: ToU8<T>,
        Self: SetU8<T>,
    {
        self.shift_left(target);
    }

    /// `SRA r8/[HL]`: [7] -> [7 -> 0] -> C
    ///
    /// Flags: `z00c`
    fn sra<T: Copy>(&mut self, target: T)
    where
        Self: ToU8<T>,
        Self: SetU8<T>,
    {
        let value = self.read_u8_value(target);
        let new_value = (value & 0x80) | (value >> 1);

        self.registers.set_zf(new_value == 0);
        self.registers.set_n(false);
        self.registers.set_h(false);
        self.registers.set_cf(value & 0x1 != 0);

        self.set_u8_value(target, new_value);
    }

    /// `SWAP r8/[HL]`: exchange the nibbles.
    ///
    /// Flags: `z000`
    fn swap<T: Copy>(&mut self, target: T)
    where
        Self: ToU8<T>,
        Self: SetU8<T>,
    {
        let value = self.read_u8_value(target);
        let new_value = (value << 4) | (value >> 4);

        self.registers.set_zf(new_value == 0);
        self.registers.set_n(false);
        self.registers.set_h(false);
        self.registers.set_cf(false);

        self.set_u8_value(target, new_value);
    }

    /// `SRL r8/[HL]`: 0 -> [7 -> 0] -> C
    ///
    /// Flags: `z00c`
    fn srl<T: Copy>(&mut self, target: T)
    where
        Self: ToU8<T>,
        Self: SetU8<T>,
    {
        self.shift_right(target);
    }

    /// `BIT n,r8/[HL]`: Z is the inverted bit under test.
    ///
    /// Flags: `z01-`
    fn bit<T: Copy>(&mut self, bit: u8, target: T)
    where
        Self: ToU8<T>,
    {
        let value = self.read_u8_value(target);

        self.registers.set_zf(value & (1 << bit) == 0);
        self.registers.set_n(false);
        self.registers.set_h(true);
    }

    /// `RES n,r8/[HL]`, no flags.
    fn res<T: Copy>(&mut self, bit: u8, target: T)
    where
        Self: ToU8<T>,
        Self: SetU8<T>,
    {
        let value = self.read_u8_value(target);
        self.set_u8_value(target, value & !(1 << bit));
    }

    /// `SET n,r8/[HL]`, no flags.
    fn set<T: Copy>(&mut self, bit: u8, target: T)
    where
        Self: ToU8<T>,
        Self: SetU8<T>,
    {
        let value = self.read_u8_value(target);
        self.set_u8_value(target, value | (1 << bit));
    }
}

impl<M: MemoryMapper> ToU16<Reg16> for Cpu<M> {
    fn read_u16_value(&mut self, target: Reg16) -> u16 {
        match target {
            Reg16::AF => self.registers.af(),
            Reg16::BC => self.registers.bc(),
            Reg16::DE => self.registers.de(),
            Reg16::HL => self.registers.hl(),
            Reg16::SP => self.registers.sp,
        }
    }
}

impl<M: MemoryMapper> SetU16<Reg16> for Cpu<M> {
    fn set_u16_value(&mut self, target: Reg16, value: u16) {
        match target {
            Reg16::AF => self.registers.set_af(value),
            Reg16::BC => self.registers.set_bc(value),
            Reg16::DE => self.registers.set_de(value),
            Reg16::HL => self.registers.set_hl(value),
            Reg16::SP => self.registers.sp = value,
        }
    }
}

impl<M: MemoryMapper> ToU16<Operand16> for Cpu<M> {
    fn read_u16_value(&mut self, target: Operand16) -> u16 {
        match target {
            Operand16::Immediate => self.operand_word,
            Operand16::Direct => self.mmu.read_short(self.operand_word),
        }
    }
}

impl<M: MemoryMapper> SetU16<Operand16> for Cpu<M> {
    fn set_u16_value(&mut self, target: Operand16, value: u16) {
        match target {
            Operand16::Immediate => {
                unreachable!("an immediate operand is never a destination")
            }
            Operand16::Direct => self.write_short_traced(self.operand_word, value),
        }
    }
}
