use crate::hardware::cpu::Cpu;
use crate::hardware::mmu::MemoryMapper;
use crate::io::interrupts::{Interrupt, InterruptFlags};
use crate::DebugSettings;

mod instruction_tests;

// Common functionality for the CPU tests: a flat 64 KiB memory with just
// enough interrupt state bolted on to satisfy the bus interface.

pub struct TestMemory {
    mem: Vec<u8>,
    pub interrupt_flag: InterruptFlags,
    pub interrupt_enable: InterruptFlags,
}

impl MemoryMapper for TestMemory {
    fn read_byte(&self, address: u16) -> u8 {
        self.mem[address as usize]
    }

    fn write_byte(&mut self, address: u16, value: u8) {
        self.mem[address as usize] = value;
    }

    fn boot_rom_finished(&self) -> bool {
        false
    }

    fn interrupt_flag(&self) -> InterruptFlags {
        self.interrupt_flag
    }

    fn interrupt_enable(&self) -> InterruptFlags {
        self.interrupt_enable
    }

    fn clear_interrupt(&mut self, interrupt: Interrupt) {
        self.interrupt_flag.remove(interrupt.flag());
    }
}

impl std::fmt::Debug for TestMemory {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "TestMemory")
    }
}

pub fn initial_cpu() -> Cpu<TestMemory> {
    Cpu::new(
        TestMemory {
            mem: vec![0; 0x10000],
            interrupt_flag: InterruptFlags::default(),
            interrupt_enable: InterruptFlags::default(),
        },
        DebugSettings::default(),
    )
}

pub fn read_short(cpu: &Cpu<TestMemory>, address: u16) -> u16 {
    cpu.mmu.read_short(address)
}

pub fn set_short(cpu: &mut Cpu<TestMemory>, address: u16, value: u16) {
    cpu.mmu.write_short(address, value);
}

/// Run master cycles until the current instruction has been fully paid for,
/// returning how many were needed.
pub fn step_instruction(cpu: &mut Cpu<TestMemory>) -> u32 {
    let mut cycles = 0;
    loop {
        cpu.tick();
        cycles += 1;
        if cpu.cycles_until_next_instr == 0 {
            return cycles;
        }
    }
}
