//! Static decode information for the full opcode space: mnemonic, byte size
//! and machine-cycle cost per opcode, for both the raw and the CB-prefixed
//! table. The execution core uses the size/cycle columns; debugger overlays
//! read the mnemonics for disassembly.

/// One opcode's worth of decode data. Conditional instructions carry both
/// the taken and the not-taken cycle cost; for everything else the two
/// columns are equal.
#[derive(Debug, Copy, Clone)]
pub struct OpInfo {
    pub mnemonic: &'static str,
    pub size: u8,
    pub cycles: u8,
    pub cycles_not_taken: u8,
}

const fn op(mnemonic: &'static str, size: u8, cycles: u8) -> OpInfo {
    OpInfo {
        mnemonic,
        size,
        cycles,
        cycles_not_taken: cycles,
    }
}

const fn branch(mnemonic: &'static str, size: u8, cycles: u8, cycles_not_taken: u8) -> OpInfo {
    OpInfo {
        mnemonic,
        size,
        cycles,
        cycles_not_taken,
    }
}

/// Placeholder for the holes in the opcode map; executing one is a fault.
const fn illegal() -> OpInfo {
    op("???", 1, 4)
}

#[rustfmt::skip]
pub static UNPREFIXED: [OpInfo; 256] = [
    // 0x0_
    op("NOP", 1, 4), op("LD BC,d16", 3, 12), op("LD (BC),A", 1, 8), op("INC BC", 1, 8),
    op("INC B", 1, 4), op("DEC B", 1, 4), op("LD B,d8", 2, 8), op("RLCA", 1, 4),
    op("LD (a16),SP", 3, 20), op("ADD HL,BC", 1, 8), op("LD A,(BC)", 1, 8), op("DEC BC", 1, 8),
    op("INC C", 1, 4), op("DEC C", 1, 4), op("LD C,d8", 2, 8), op("RRCA", 1, 4),
    // 0x1_
    op("STOP", 2, 4), op("LD DE,d16", 3, 12), op("LD (DE),A", 1, 8), op("INC DE", 1, 8),
    op("INC D", 1, 4), op("DEC D", 1, 4), op("LD D,d8", 2, 8), op("RLA", 1, 4),
    op("JR r8", 2, 12), op("ADD HL,DE", 1, 8), op("LD A,(DE)", 1, 8), op("DEC DE", 1, 8),
    op("INC E", 1, 4), op("DEC E", 1, 4), op("LD E,d8", 2, 8), op("RRA", 1, 4),
    // 0x2_
    branch("JR NZ,r8", 2, 12, 8), op("LD HL,d16", 3, 12), op("LD (HL+),A", 1, 8), op("INC HL", 1, 8),
    op("INC H", 1, 4), op("DEC H", 1, 4), op("LD H,d8", 2, 8), op("DAA", 1, 4),
    branch("JR Z,r8", 2, 12, 8), op("ADD HL,HL", 1, 8), op("LD A,(HL+)", 1, 8), op("DEC HL", 1, 8),
    op("INC L", 1, 4), op("DEC L", 1, 4), op("LD L,d8", 2, 8), op("CPL", 1, 4),
    // 0x3_
    branch("JR NC,r8", 2, 12, 8), op("LD SP,d16", 3, 12), op("LD (HL-),A", 1, 8), op("INC SP", 1, 8),
    op("INC (HL)", 1, 12), op("DEC (HL)", 1, 12), op("LD (HL),d8", 2, 12), op("SCF", 1, 4),
    branch("JR C,r8", 2, 12, 8), op("ADD HL,SP", 1, 8), op("LD A,(HL-)", 1, 8), op("DEC SP", 1, 8),
    op("INC A", 1, 4), op("DEC A", 1, 4), op("LD A,d8", 2, 8), op("CCF", 1, 4),
    // 0x4_
    op("LD B,B", 1, 4), op("LD B,C", 1, 4), op("LD B,D", 1, 4), op("LD B,E", 1, 4),
    op("LD B,H", 1, 4), op("LD B,L", 1, 4), op("LD B,(HL)", 1, 8), op("LD B,A", 1, 4),
    op("LD C,B", 1, 4), op("LD C,C", 1, 4), op("LD C,D", 1, 4), op("LD C,E", 1, 4),
    op("LD C,H", 1, 4), op("LD C,L", 1, 4), op("LD C,(HL)", 1, 8), op("LD C,A", 1, 4),
    // 0x5_
    op("LD D,B", 1, 4), op("LD D,C", 1, 4), op("LD D,D", 1, 4), op("LD D,E", 1, 4),
    op("LD D,H", 1, 4), op("LD D,L", 1, 4), op("LD D,(HL)", 1, 8), op("LD D,A", 1, 4),
    op("LD E,B", 1, 4), op("LD E,C", 1, 4), op("LD E,D", 1, 4), op("LD E,E", 1, 4),
    op("LD E,H", 1, 4), op("LD E,L", 1, 4), op("LD E,(HL)", 1, 8), op("LD E,A", 1, 4),
    // 0x6_
    op("LD H,B", 1, 4), op("LD H,C", 1, 4), op("LD H,D", 1, 4), op("LD H,E", 1, 4),
    op("LD H,H", 1, 4), op("LD H,L", 1, 4), op("LD H,(HL)", 1, 8), op("LD H,A", 1, 4),
    op("LD L,B", 1, 4), op("LD L,C", 1, 4), op("LD L,D", 1, 4), op("LD L,E", 1, 4),
    op("LD L,H", 1, 4), op("LD L,L", 1, 4), op("LD L,(HL)", 1, 8), op("LD L,A", 1, 4),
    // 0x7_
    op("LD (HL),B", 1, 8), op("LD (HL),C", 1, 8), op("LD (HL),D", 1, 8), op("LD (HL),E", 1, 8),
    op("LD (HL),H", 1, 8), op("LD (HL),L", 1, 8), op("HALT", 1, 4), op("LD (HL),A", 1, 8),
    op("LD A,B", 1, 4), op("LD A,C", 1, 4), op("LD A,D", 1, 4), op("LD A,E", 1, 4),
    op("LD A,H", 1, 4), op("LD A,L", 1, 4), op("LD A,(HL)", 1, 8), op("LD A,A", 1, 4),
    // 0x8_
    op("ADD A,B", 1, 4), op("ADD A,C", 1, 4), op("ADD A,D", 1, 4), op("ADD A,E", 1, 4),
    op("ADD A,H", 1, 4), op("ADD A,L", 1, 4), op("ADD A,(HL)", 1, 8), op("ADD A,A", 1, 4),
    op("ADC A,B", 1, 4), op("ADC A,C", 1, 4), op("ADC A,D", 1, 4), op("ADC A,E", 1, 4),
    op("ADC A,H", 1, 4), op("ADC A,L", 1, 4), op("ADC A,(HL)", 1, 8), op("ADC A,A", 1, 4),
    // 0x9_
    op("SUB B", 1, 4), op("SUB C", 1, 4), op("SUB D", 1, 4), op("SUB E", 1, 4),
    op("SUB H", 1, 4), op("SUB L", 1, 4), op("SUB (HL)", 1, 8), op("SUB A", 1, 4),
    op("SBC A,B", 1, 4), op("SBC A,C", 1, 4), op("SBC A,D", 1, 4), op("SBC A,E", 1, 4),
    op("SBC A,H", 1, 4), op("SBC A,L", 1, 4), op("SBC A,(HL)", 1, 8), op("SBC A,A", 1, 4),
    // 0xA_
    op("AND B", 1, 4), op("AND C", 1, 4), op("AND D", 1, 4), op("AND E", 1, 4),
    op("AND H", 1, 4), op("AND L", 1, 4), op("AND (HL)", 1, 8), op("AND A", 1, 4),
    op("XOR B", 1, 4), op("XOR C", 1, 4), op("XOR D", 1, 4), op("XOR E", 1, 4),
    op("XOR H", 1, 4), op("XOR L", 1, 4), op("XOR (HL)", 1, 8), op("XOR A", 1, 4),
    // 0xB_
    op("OR B", 1, 4), op("OR C", 1, 4), op("OR D", 1, 4), op("OR E", 1, 4),
    op("OR H", 1, 4), op("OR L", 1, 4), op("OR (HL)", 1, 8), op("OR A", 1, 4),
    op("CP B", 1, 4), op("CP C", 1, 4), op("CP D", 1, 4), op("CP E", 1, 4),
    op("CP H", 1, 4), op("CP L", 1, 4), op("CP (HL)", 1, 8), op("CP A", 1, 4),
    // 0xC_
    branch("RET NZ", 1, 20, 8), op("POP BC", 1, 12), branch("JP NZ,a16", 3, 16, 12), op("JP a16", 3, 16),
    branch("CALL NZ,a16", 3, 24, 12), op("PUSH BC", 1, 16), op("ADD A,d8", 2, 8), op("RST 00H", 1, 16),
    branch("RET Z", 1, 20, 8), op("RET", 1, 16), branch("JP Z,a16", 3, 16, 12), op("PREFIX CB", 1, 4),
    branch("CALL Z,a16", 3, 24, 12), op("CALL a16", 3, 24), op("ADC A,d8", 2, 8), op("RST 08H", 1, 16),
    // 0xD_
    branch("RET NC", 1, 20, 8), op("POP DE", 1, 12), branch("JP NC,a16", 3, 16, 12), illegal(),
    branch("CALL NC,a16", 3, 24, 12), op("PUSH DE", 1, 16), op("SUB d8", 2, 8), op("RST 10H", 1, 16),
    branch("RET C", 1, 20, 8), op("RETI", 1, 16), branch("JP C,a16", 3, 16, 12), illegal(),
    branch("CALL C,a16", 3, 24, 12), illegal(), op("SBC A,d8", 2, 8), op("RST 18H", 1, 16),
    // 0xE_
    op("LDH (a8),A", 2, 12), op("POP HL", 1, 12), op("LD (C),A", 1, 8), illegal(),
    illegal(), op("PUSH HL", 1, 16), op("AND d8", 2, 8), op("RST 20H", 1, 16),
    op("ADD SP,r8", 2, 16), op("JP HL", 1, 4), op("LD (a16),A", 3, 16), illegal(),
    illegal(), illegal(), op("XOR d8", 2, 8), op("RST 28H", 1, 16),
    // 0xF_
    op("LDH A,(a8)", 2, 12), op("POP AF", 1, 12), op("LD A,(C)", 1, 8), op("DI", 1, 4),
    illegal(), op("PUSH AF", 1, 16), op("OR d8", 2, 8), op("RST 30H", 1, 16),
    op("LD HL,SP+r8", 2, 12), op("LD SP,HL", 1, 8), op("LD A,(a16)", 3, 16), op("EI", 1, 4),
    illegal(), illegal(), op("CP d8", 2, 8), op("RST 38H", 1, 16),
];

#[rustfmt::skip]
static PREFIXED_MNEMONICS: [&str; 256] = [
    "RLC B", "RLC C", "RLC D", "RLC E", "RLC H", "RLC L", "RLC (HL)", "RLC A",
    "RRC B", "RRC C", "RRC D", "RRC E", "RRC H", "RRC L", "RRC (HL)", "RRC A",
    "RL B", "RL C", "RL D", "RL E", "RL H", "RL L", "RL (HL)", "RL A",
    "RR B", "RR C", "RR D", "RR E", "RR H", "RR L", "RR (HL)", "RR A",
    "SLA B", "SLA C", "SLA D", "SLA E", "SLA H", "SLA L", "SLA (HL)", "SLA A",
    "SRA B", "SRA C", "SRA D", "SRA E", "SRA H", "SRA L", "SRA (HL)", "SRA A",
    "SWAP B", "SWAP C", "SWAP D", "SWAP E", "SWAP H", "SWAP L", "SWAP (HL)", "SWAP A",
    "SRL B", "SRL C", "SRL D", "SRL E", "SRL H", "SRL L", "SRL (HL)", "SRL A",
    "BIT 0,B", "BIT 0,C", "BIT 0,D", "BIT 0,E", "BIT 0,H", "BIT 0,L", "BIT 0,(HL)", "BIT 0,A",
    "BIT 1,B", "BIT 1,C", "BIT 1,D", "BIT 1,E", "BIT 1,H", "BIT 1,L", "BIT 1,(HL)", "BIT 1,A",
    "BIT 2,B", "BIT 2,C", "BIT 2,D", "BIT 2,E", "BIT 2,H", "BIT 2,L", "BIT 2,(HL)", "BIT 2,A",
    "BIT 3,B", "BIT 3,C", "BIT 3,D", "BIT 3,E", "BIT 3,H", "BIT 3,L", "BIT 3,(HL)", "BIT 3,A",
    "BIT 4,B", "BIT 4,C", "BIT 4,D", "BIT 4,E", "BIT 4,H", "BIT 4,L", "BIT 4,(HL)", "BIT 4,A",
    "BIT 5,B", "BIT 5,C", "BIT 5,D", "BIT 5,E", "BIT 5,H", "BIT 5,L", "BIT 5,(HL)", "BIT 5,A",
    "BIT 6,B", "BIT 6,C", "BIT 6,D", "BIT 6,E", "BIT 6,H", "BIT 6,L", "BIT 6,(HL)", "BIT 6,A",
    "BIT 7,B", "BIT 7,C", "BIT 7,D", "BIT 7,E", "BIT 7,H", "BIT 7,L", "BIT 7,(HL)", "BIT 7,A",
    "RES 0,B", "RES 0,C", "RES 0,D", "RES 0,E", "RES 0,H", "RES 0,L", "RES 0,(HL)", "RES 0,A",
    "RES 1,B", "RES 1,C", "RES 1,D", "RES 1,E", "RES 1,H", "RES 1,L", "RES 1,(HL)", "RES 1,A",
    "RES 2,B", "RES 2,C", "RES 2,D", "RES 2,E", "RES 2,H", "RES 2,L", "RES 2,(HL)", "RES 2,A",
    "RES 3,B", "RES 3,C", "RES 3,D", "RES 3,E", "RES 3,H", "RES 3,L", "RES 3,(HL)", "RES 3,A",
    "RES 4,B", "RES 4,C", "RES 4,D", "RES 4,E", "RES 4,H", "RES 4,L", "RES 4,(HL)", "RES 4,A",
    "RES 5,B", "RES 5,C", "RES 5,D", "RES 5,E", "RES 5,H", "RES 5,L", "RES 5,(HL)", "RES 5,A",
    "RES 6,B", "RES 6,C", "RES 6,D", "RES 6,E", "RES 6,H", "RES 6,L", "RES 6,(HL)", "RES 6,A",
    "RES 7,B", "RES 7,C", "RES 7,D", "RES 7,E", "RES 7,H", "RES 7,L", "RES 7,(HL)", "RES 7,A",
    "SET 0,B", "SET 0,C", "SET 0,D", "SET 0,E", "SET 0,H", "SET 0,L", "SET 0,(HL)", "SET 0,A",
    "SET 1,B", "SET 1,C", "SET 1,D", "SET 1,E", "SET 1,H", "SET 1,L", "SET 1,(HL)", "SET 1,A",
    "SET 2,B", "SET 2,C", "SET 2,D", "SET 2,E", "SET 2,H", "SET 2,L", "SET 2,(HL)", "SET 2,A",
    "SET 3,B", "SET 3,C", "SET 3,D", "SET 3,E", "SET 3,H", "SET 3,L", "SET 3,(HL)", "SET 3,A",
    "SET 4,B", "SET 4,C", "SET 4,D", "SET 4,E", "SET 4,H", "SET 4,L", "SET 4,(HL)", "SET 4,A",
    "SET 5,B", "SET 5,C", "SET 5,D", "SET 5,E", "SET 5,H", "SET 5,L", "SET 5,(HL)", "SET 5,A",
    "SET 6,B", "SET 6,C", "SET 6,D", "SET 6,E", "SET 6,H", "SET 6,L", "SET 6,(HL)", "SET 6,A",
    "SET 7,B", "SET 7,C", "SET 7,D", "SET 7,E", "SET 7,H", "SET 7,L", "SET 7,(HL)", "SET 7,A",
];

/// Decode data for a CB-prefixed opcode. Sizes and cycles are uniform: two
/// bytes, 8 cycles for register targets and 16 for `(HL)`.
pub fn prefixed_info(opcode: u8) -> OpInfo {
    let cycles = if opcode & 0x7 == 0x6 { 16 } else { 8 };
    OpInfo {
        mnemonic: PREFIXED_MNEMONICS[opcode as usize],
        size: 2,
        cycles,
        cycles_not_taken: cycles,
    }
}

/// Disassembly helper for debugger frontends.
pub fn get_assembly_from_opcode(opcode: u8, prefixed: bool) -> &'static str {
    if prefixed {
        PREFIXED_MNEMONICS[opcode as usize]
    } else {
        UNPREFIXED[opcode as usize].mnemonic
    }
}
