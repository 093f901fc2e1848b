use anyhow::{bail, Context, Result};
use clap::{Args, Parser, Subcommand};
use memory_inspector::config::{validate_config, Config, ConfigLoader, DEFAULT_CONFIG_FILE};
use memory_inspector::core::types::parse_hex_address;
use memory_inspector::{
    AddressSpaceKind, AddressSpaceProvider, AddressSpaces, BufferRegion, MemoryInspector,
    SearchDirection, SearchOutcome, TargetAddress, ValueEncoding,
};
use serde::Serialize;
use std::fs;
use std::path::PathBuf;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(name = "memory-inspector", version)]
#[command(about = "Resolve, encode, search and patch raw emulator memory images")]
struct Cli {
    /// Configuration file
    #[arg(short, long, default_value = DEFAULT_CONFIG_FILE)]
    config: PathBuf,

    /// Print results as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Args)]
struct TargetArgs {
    /// Base address, unsigned hex
    #[arg(short, long, default_value = "")]
    address: String,

    /// Signed hex offset applied to the address
    #[arg(short, long, default_value = "", allow_hyphen_values = true)]
    offset: String,
}

#[derive(Args)]
struct ValueArgs {
    /// Value encoding (s8, s16, s32, u8, u16, u32, float, double, ascii, hexstr)
    #[arg(short, long)]
    encoding: Option<ValueEncoding>,

    /// Parse integer values as hexadecimal
    #[arg(long)]
    hex: bool,

    /// Value text
    #[arg(allow_hyphen_values = true)]
    value: String,
}

#[derive(Args)]
struct ImageArgs {
    /// Raw memory image
    #[arg(short, long)]
    image: PathBuf,

    /// Address the first byte of the image is mapped at
    #[arg(short, long, value_parser = parse_base, default_value = "0")]
    base: u32,
}

#[derive(Subcommand)]
enum Command {
    /// Combine an address and offset into a target address
    Resolve(TargetArgs),

    /// Show the bytes a value encodes to
    Encode(ValueArgs),

    /// Search an image for a value
    Find {
        #[command(flatten)]
        image: ImageArgs,
        #[command(flatten)]
        target: TargetArgs,
        #[command(flatten)]
        value: ValueArgs,
        /// Search towards lower addresses
        #[arg(long)]
        backward: bool,
    },

    /// Write a value into an image
    Set {
        #[command(flatten)]
        image: ImageArgs,
        #[command(flatten)]
        target: TargetArgs,
        #[command(flatten)]
        value: ValueArgs,
        /// Where to write the patched image (defaults to in place)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Copy a file's bytes into an image
    Load {
        #[command(flatten)]
        image: ImageArgs,
        #[command(flatten)]
        target: TargetArgs,
        /// File whose contents are written
        file: PathBuf,
        /// Where to write the patched image (defaults to in place)
        #[arg(long)]
        output: Option<PathBuf>,
    },

    /// Dump an image as a raw address space file
    Dump {
        #[command(flatten)]
        image: ImageArgs,
        /// Space to dump as (mem1, mem2, auxiliary, fake)
        #[arg(short, long)]
        kind: AddressSpaceKind,
        /// Output directory (defaults to the configured dump directory)
        #[arg(short, long)]
        dir: Option<PathBuf>,
    },
}

#[derive(Serialize)]
struct EncodeReport {
    encoding: ValueEncoding,
    preview: String,
    bytes: String,
}

#[derive(Serialize)]
struct WriteReport {
    address: String,
    len: usize,
    image: PathBuf,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let loader = ConfigLoader::new(&cli.config);
    let loaded = loader.load();
    let config = match &loaded {
        Ok(config) => config.clone(),
        Err(_) => Config::default(),
    };
    init_logging(&config.logging.level);

    match loaded {
        Ok(_) => info!("Loaded config from {}", loader.path().display()),
        Err(e) if cli.config.as_os_str() != DEFAULT_CONFIG_FILE => {
            warn!("Failed to load config: {}, using defaults", e)
        }
        Err(_) => {}
    }
    validate_config(&config).context("invalid configuration")?;

    run(cli.command, &config, cli.json)
}

fn init_logging(level: &str) {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}

fn run(command: Command, config: &Config, json: bool) -> Result<()> {
    match command {
        Command::Resolve(target) => {
            let resolved = TargetAddress::resolve(&target.address, &target.offset);
            if json {
                println!("{}", serde_json::to_string_pretty(&resolved)?);
            } else {
                println!("{:08x}", resolved.valid()?);
            }
        }
        Command::Encode(value) => {
            let encoding = value.encoding.unwrap_or(config.inspector.default_encoding);
            let encoded = encoding.encode(&value.value, value.hex || config.inspector.hex_base)?;
            let report = EncodeReport {
                encoding,
                preview: encoded.preview.clone(),
                bytes: hex::encode(&encoded.bytes),
            };
            if json {
                println!("{}", serde_json::to_string_pretty(&report)?);
            } else {
                println!("{}", report.preview);
            }
        }
        Command::Find {
            image,
            target,
            value,
            backward,
        } => {
            let mut inspector = open_inspector(&image, config)?;
            apply_target(&mut inspector, &target);
            apply_value(&mut inspector, &value, config);

            inspector.target().valid()?;
            let pattern_len = inspector.preview()?.bytes.len();
            if pattern_len > config.search.max_pattern_len {
                bail!(
                    "search pattern is {} bytes, limit is {}",
                    pattern_len,
                    config.search.max_pattern_len
                );
            }

            let direction = if backward {
                SearchDirection::Backward
            } else {
                SearchDirection::Forward
            };
            let outcome = inspector.find(direction)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&outcome)?);
            } else {
                match outcome {
                    SearchOutcome::Found(address) => println!("Match Found: {:08x}", address),
                    SearchOutcome::NoMatch => println!("No Match"),
                }
            }
        }
        Command::Set {
            image,
            target,
            value,
            output,
        } => {
            let mut inspector = open_inspector(&image, config)?;
            apply_target(&mut inspector, &target);
            apply_value(&mut inspector, &value, config);

            let address = inspector.set_value()?;
            let len = inspector.input_bytes().len();
            let written = save_image(&inspector, output.unwrap_or(image.image))?;
            report_write(address, len, written, json)?;
        }
        Command::Load {
            image,
            target,
            file,
            output,
        } => {
            let mut inspector = open_inspector(&image, config)?;
            apply_target(&mut inspector, &target);

            let address = inspector.target().valid()?;
            let len = inspector.set_value_from_file(&file)?;
            let written = save_image(&inspector, output.unwrap_or(image.image))?;
            report_write(address, len, written, json)?;
        }
        Command::Dump { image, kind, dir } => {
            let region = read_image(&image)?;
            let spaces = AddressSpaces::new().with_region(kind, region);
            let inspector = MemoryInspector::new(spaces);

            let dir = dir.unwrap_or_else(|| PathBuf::from(&config.dump.directory));
            fs::create_dir_all(&dir)
                .with_context(|| format!("failed to create {}", dir.display()))?;
            let path = inspector.dump(kind, &dir)?;
            if json {
                println!("{}", serde_json::to_string_pretty(&path)?);
            } else {
                println!("Dumped {} to {}", kind, path.display());
            }
        }
    }

    Ok(())
}

fn parse_base(text: &str) -> Result<u32, String> {
    parse_hex_address(text.trim()).ok_or_else(|| format!("'{}' is not a hex address", text))
}

fn read_image(image: &ImageArgs) -> Result<BufferRegion> {
    let data = fs::read(&image.image)
        .with_context(|| format!("failed to read {}", image.image.display()))?;
    Ok(BufferRegion::new(image.base, data)?)
}

fn open_inspector(image: &ImageArgs, config: &Config) -> Result<MemoryInspector<AddressSpaces>> {
    let kind = config.inspector.address_space;
    let spaces = AddressSpaces::new().with_region(kind, read_image(image)?);
    let mut inspector = MemoryInspector::new(spaces);
    inspector.set_address_space(kind);
    inspector.set_encoding(config.inspector.default_encoding);
    inspector.set_hex_base(config.inspector.hex_base);
    Ok(inspector)
}

fn apply_target(inspector: &mut MemoryInspector<AddressSpaces>, target: &TargetArgs) {
    inspector.set_address_text(target.address.as_str());
    inspector.set_offset_text(target.offset.as_str());
}

fn apply_value(inspector: &mut MemoryInspector<AddressSpaces>, value: &ValueArgs, config: &Config) {
    inspector.set_encoding(value.encoding.unwrap_or(config.inspector.default_encoding));
    inspector.set_hex_base(value.hex || config.inspector.hex_base);
    inspector.set_value_text(value.value.as_str());
}

fn save_image(inspector: &MemoryInspector<AddressSpaces>, path: PathBuf) -> Result<PathBuf> {
    let bytes = inspector
        .spaces()
        .region(inspector.address_space())?
        .read_all()?;
    fs::write(&path, bytes).with_context(|| format!("failed to write {}", path.display()))?;
    Ok(path)
}

fn report_write(address: u32, len: usize, image: PathBuf, json: bool) -> Result<()> {
    let report = WriteReport {
        address: format!("{:08x}", address),
        len,
        image,
    };
    if json {
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!(
            "Wrote {} bytes at {} to {}",
            report.len,
            report.address,
            report.image.display()
        );
    }
    Ok(())
}
