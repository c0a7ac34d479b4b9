use std::fs;
use std::io::{self, Read, Write};
use std::process;

use clap::{App, Arg, ArgMatches};
use log::{error, info};

use protodoc_model::{generate_from_bytes, Config, Error};

fn main() {
    env_logger::init();

    let matches = App::new("protodoc-model")
        .version(env!("CARGO_PKG_VERSION"))
        .about("Builds a render-ready documentation model from a protobuf descriptor set")
        .arg(
            Arg::with_name("descriptor-set")
                .short("d")
                .long("descriptor-set")
                .value_name("FILE")
                .help("Serialized FileDescriptorSet (reads stdin when omitted)")
                .takes_value(true),
        )
        .arg(
            Arg::with_name("config")
                .short("c")
                .long("config")
                .value_name("FILE")
                .help("JSON configuration file")
                .takes_value(true),
        )
        .get_matches();

    if let Err(err) = run(&matches) {
        error!("{}", err);
        eprintln!("protodoc-model: {}", err);
        process::exit(1);
    }
}

fn run(matches: &ArgMatches) -> Result<(), Error> {
    let config = match matches.value_of("config") {
        Some(path) => Config::from_file(path)?,
        None => Config::default(),
    };

    let bytes = match matches.value_of("descriptor-set") {
        Some(path) => fs::read(path)?,
        None => read_stdin()?,
    };
    info!("Read descriptor set of {} bytes", bytes.len());

    let template = generate_from_bytes(&bytes, &config)?;
    let json = template.to_json(config.pretty)?;

    let mut stdout = io::stdout();
    stdout.write_all(json.as_bytes())?;
    stdout.write_all(b"\n")?;

    Ok(())
}

fn read_stdin() -> Result<Vec<u8>, Error> {
    if atty::is(atty::Stream::Stdin) {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::InvalidInput,
            "expected a descriptor set on stdin or --descriptor-set <FILE>",
        )));
    }

    let mut buffer = Vec::new();
    io::stdin().read_to_end(&mut buffer)?;

    if buffer.is_empty() {
        return Err(Error::Io(io::Error::new(
            io::ErrorKind::InvalidData,
            "received empty buffer from stdin",
        )));
    }

    Ok(buffer)
}
