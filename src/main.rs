use std::error::Error;
use std::fs::File;
use std::io::Write;

use chip8_vm::config::{BoundsPolicy, Config, OpcodePolicy, DEFAULT_TICKS_PER_SECOND};
use chip8_vm::display::MonoTermDisplay;
use chip8_vm::environment::Environment;
use chip8_vm::input::StdinInput;
use chip8_vm::sound::{Mute, SimpleBeep, Sound};
use clap::Parser;

#[derive(Parser, Debug)]
#[command(about = "CHIP-8 virtual machine in the terminal")]
struct Args {
    /// ROM to run
    rom: String,

    /// ticks (instructions) per second
    #[arg(long, default_value_t = DEFAULT_TICKS_PER_SECOND, value_parser = clap::value_parser!(u32).range(1..))]
    tps: u32,

    /// seed for RND, for reproducible runs
    #[arg(long)]
    seed: Option<u64>,

    /// stop after this many ticks
    #[arg(long)]
    ticks: Option<u64>,

    /// wrap the program counter and stack instead of stopping
    #[arg(long)]
    wrap: bool,

    /// step over words that aren't instructions instead of stopping
    #[arg(long)]
    skip_invalid: bool,

    /// no beeping
    #[arg(long)]
    mute: bool,
}

fn main() -> Result<(), Box<dyn Error>> {
    let args = Args::parse();
    env_logger::builder()
        .format(|buf, record| writeln!(buf, "{}: {}", record.level(), record.args()))
        .init();
    log::info!("CHIP-8 starting");

    let config = Config {
        ticks_per_second: args.tps,
        bounds: if args.wrap { BoundsPolicy::Wrap } else { BoundsPolicy::Fail },
        on_invalid_opcode: if args.skip_invalid { OpcodePolicy::Skip } else { OpcodePolicy::Halt },
        seed: args.seed,
        ..Config::default()
    };

    let mut f = File::open(&args.rom)?;

    let mut display = MonoTermDisplay::new()?;
    let mut input = StdinInput::new()?;
    let mut beep = SimpleBeep::new();
    let mut mute = Mute::new();
    let sound: &mut dyn Sound = if args.mute { &mut mute } else { &mut beep };

    let mut environment = Environment::new(config, &mut display, &mut input, sound)?;
    environment.load_program(&mut f)?;
    let result = environment.main_loop(args.ticks);
    drop(environment);
    drop(input);

    // shove some junk on stdout to stop the cli messing up the last frame
    for _ in 0..12 {
        println!();
    }
    result?;
    log::info!("CHIP-8 stopping");
    Ok(())
}
