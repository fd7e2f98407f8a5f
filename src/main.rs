use anyhow::Result;
use clap::Parser;

use lora_e22::transport::SerialTransport;
use lora_e22::{E22, Mode, RadioConfig, Register};

#[derive(clap::Parser)]
#[clap(
    name = "lora-e22",
    about = "Configure EBYTE E22 LoRa modules over a serial adapter",
    version
)]
struct Cli {
    /// Serial port; the first detected port when omitted
    #[clap(long, global = true)]
    port: Option<String>,

    /// UART baud rate of the module
    #[clap(long, global = true, default_value_t = 9600)]
    baud: u32,

    /// Log every frame on the wire
    #[clap(long, global = true)]
    verbose: bool,

    #[clap(subcommand)]
    command: Cmd,
}

#[derive(clap::Subcommand)]
enum Cmd {
    /// List available serial ports
    Scan,
    /// Read the product id and show the stored working configuration
    Info,
    /// Check whether a module answers on the port
    Probe,
    /// Write the full working configuration block (REG0..REG3)
    Config {
        #[clap(long, value_parser = parse_byte, default_value = "0x62")]
        reg0: u8,
        #[clap(long, value_parser = parse_byte, default_value = "0x00")]
        reg1: u8,
        #[clap(long, value_parser = parse_byte, default_value = "0x03")]
        reg3: u8,
        #[clap(long, default_value_t = 0)]
        channel: u8,
        /// Symbolic field setting on top of the raw bytes, e.g.
        /// `--set baud=115200 --set tx-power=21`; may be repeated
        #[clap(long = "set", value_name = "FIELD=VALUE")]
        set: Vec<String>,
    },
    /// Set the RF channel (0-83)
    Channel {
        channel: u8,
        /// Do not persist; reverts on power-down
        #[clap(long)]
        volatile: bool,
    },
    /// Read the network id, or set it when a value is given
    NetId {
        #[clap(value_parser = parse_byte)]
        value: Option<u8>,
    },
    /// Read the 16-bit module address, or set it when a value is given
    Address {
        #[clap(value_parser = parse_word)]
        value: Option<u16>,
    },
    /// Read raw registers by name (addr-h, net-id, reg0.., channel, pid)
    ReadReg {
        name: String,
        #[clap(long, default_value_t = 1)]
        len: usize,
    },
    /// Write raw bytes starting at a named register
    WriteReg {
        name: String,
        #[clap(required = true, value_parser = parse_byte)]
        values: Vec<u8>,
    },
    /// Select the operating mode
    Mode {
        #[clap(value_enum)]
        mode: ModeArg,
    },
}

#[derive(Clone, Copy, clap::ValueEnum)]
enum ModeArg {
    Normal,
    Wor,
    Configuration,
    DeepSleep,
}

impl From<ModeArg> for Mode {
    fn from(value: ModeArg) -> Self {
        match value {
            ModeArg::Normal => Mode::Normal,
            ModeArg::Wor => Mode::WakeOnRadio,
            ModeArg::Configuration => Mode::Configuration,
            ModeArg::DeepSleep => Mode::DeepSleep,
        }
    }
}

fn parse_byte(s: &str) -> Result<u8, String> {
    parse_prefixed(s).map_err(|e| e.to_string())
}

fn parse_word(s: &str) -> Result<u16, String> {
    parse_prefixed(s).map_err(|e| e.to_string())
}

fn parse_prefixed<T: FromStrRadix>(s: &str) -> Result<T, std::num::ParseIntError> {
    let s = s.trim();
    match s.strip_prefix("0x").or_else(|| s.strip_prefix("0X")) {
        Some(hex) => T::from_str_radix(hex, 16),
        None => T::from_str_radix(s, 10),
    }
}

trait FromStrRadix: Sized {
    fn from_str_radix(s: &str, radix: u32) -> Result<Self, std::num::ParseIntError>;
}

impl FromStrRadix for u8 {
    fn from_str_radix(s: &str, radix: u32) -> Result<Self, std::num::ParseIntError> {
        u8::from_str_radix(s, radix)
    }
}

impl FromStrRadix for u16 {
    fn from_str_radix(s: &str, radix: u32) -> Result<Self, std::num::ParseIntError> {
        u16::from_str_radix(s, radix)
    }
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let level = if cli.verbose {
        simplelog::LevelFilter::Debug
    } else {
        simplelog::LevelFilter::Info
    };
    let _ = simplelog::TermLogger::init(
        level,
        simplelog::Config::default(),
        simplelog::TerminalMode::Mixed,
        simplelog::ColorChoice::Auto,
    );

    if let Cmd::Scan = cli.command {
        for port in SerialTransport::scan_ports()? {
            println!("{port}");
        }
        return Ok(());
    }

    let port = match cli.port {
        Some(port) => port,
        None => SerialTransport::scan_ports()?
            .into_iter()
            .next()
            .ok_or_else(|| anyhow::anyhow!("no serial ports found, try --port"))?,
    };
    let mut e22 = E22::new_from_serial(&port, cli.baud)?;

    match cli.command {
        Cmd::Scan => unreachable!(),
        Cmd::Info => {
            let pid = e22.read_product_id()?;
            println!("product id: 0x{pid:02x}");
            println!("config: {}", e22.config());
        }
        Cmd::Probe => {
            if e22.probe()? {
                println!("module found on {port}");
            } else {
                anyhow::bail!("no module answered on {}", port);
            }
        }
        Cmd::Config {
            reg0,
            reg1,
            reg3,
            channel,
            set,
        } => {
            let mut config = RadioConfig {
                reg0,
                reg1,
                channel,
                reg3,
            };
            for setting in &set {
                let (field, value) = setting.split_once('=').ok_or_else(|| {
                    anyhow::anyhow!("expected FIELD=VALUE, got {setting:?}")
                })?;
                config.set_field(field.trim(), value.trim())?;
            }
            e22.set_config(config.reg0, config.reg1, config.reg3, config.channel)?;
        }
        Cmd::Channel { channel, volatile } => {
            if volatile {
                e22.set_channel_volatile(channel)?;
            } else {
                e22.set_channel(channel)?;
            }
        }
        Cmd::NetId { value } => match value {
            Some(id) => e22.set_net_id(id)?,
            None => println!("net id: 0x{:02x}", e22.get_net_id()?),
        },
        Cmd::Address { value } => match value {
            Some(addr) => e22.set_address(addr)?,
            None => println!("address: 0x{:04x}", e22.get_address()?),
        },
        Cmd::ReadReg { name, len } => {
            let register = Register::from_name(&name)?;
            let bytes = e22.read_register(register, len)?;
            println!("{}: {}", register.name(), hex::encode(&bytes));
        }
        Cmd::WriteReg { name, values } => {
            let register = Register::from_name(&name)?;
            e22.write_register(register, &values)?;
            log::info!("wrote {} bytes at {}", values.len(), register.name());
        }
        Cmd::Mode { mode } => {
            e22.set_mode(mode.into())?;
        }
    }

    Ok(())
}
