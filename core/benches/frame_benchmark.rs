use criterion::{criterion_group, criterion_main, Criterion};
use dotmatrix_core::emulator::Emulator;
use dotmatrix_core::{EmulatorOptionsBuilder, JoypadState};

/// A minimal cart spinning in a NOP/JP loop, enough to exercise the full
/// CPU/PPU/APU cascade without a ROM file on disk.
fn make_loop_rom() -> Vec<u8> {
    let mut rom = vec![0u8; 0x8000];
    rom[0x100] = 0x00;
    rom[0x101] = 0xC3;
    rom[0x102] = 0x00;
    rom[0x103] = 0x01;
    rom
}

fn frame_benchmark(c: &mut Criterion) {
    let rom = make_loop_rom();
    let mut emulator = Emulator::new(&rom, EmulatorOptionsBuilder::new().build()).unwrap();
    let input = JoypadState::default();
    let queue = emulator.audio_queue();

    c.bench_function("emulate frame", |b| {
        b.iter(|| {
            emulator.run_frame(&input);
            // Keep the audio queue from saturating mid-benchmark.
            let mut sink = Vec::new();
            queue.drain(usize::max_value(), &mut sink);
            sink.len()
        })
    });
}

criterion_group!(benches, frame_benchmark);
criterion_main!(benches);
