use std::{
    fs::File,
    io::{self, BufRead, BufReader, BufWriter, Write},
    path::PathBuf,
    process,
};

//
// gs -q -dBATCH -dSAFER -dNOPAUSE -sPAPERSIZE=letter -r600x600 \
//    -sDEVICE=pamcmyk32 -sOutputFile=- - < page.ps | hbpl1 > page.hbpl
//
use clap::Parser;
use hbpl::{Config, Error, Job, Margins, MediaType, PnmReader};
use log::{error, info, warn};

/// Convert Ghostscript pbmraw, pgmraw, ppmraw or pamcmyk32 output to HBPL
/// version 1, for the Dell C1660w and other printers.
#[derive(Parser, Debug)]
#[command(version)]
struct Args {
    /// Media code to send to printer: 0=auto, 1=plain, 2=bond, 3=lwcard,
    /// 4=lwgcard, 5=labels, 6=envelope, 7=recycled, 8=plain2, 9=bond2,
    /// 10=lwcard2, 11=lwgcard2, 12=recycled2
    #[arg(short = 'm', value_name = "media", default_value_t = 0)]
    media: u8,

    /// Erase margins of specified width
    #[arg(short = 'u', value_name = "left,top,right,bottom", default_value = "8,8,8,8")]
    margins: Margins,

    /// Filename string to send to printer
    #[arg(short = 'J', value_name = "filename")]
    filename: Option<String>,

    /// Username string to send to printer
    #[arg(short = 'U', value_name = "username")]
    username: Option<String>,

    /// Input pages; standard input when none are given
    files: Vec<PathBuf>,
}

fn main() {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"))
        .format(|buf, record| {
            writeln!(
                buf,
                "[{}:{}] {} - {}",
                record.file().unwrap_or("unknown"),
                record.line().unwrap_or(0),
                record.level(),
                record.args()
            )
        })
        .init();

    let args = Args::parse();
    if let Err(err) = run(args) {
        error!("{}", err);
        process::exit(1);
    }
}

fn run(args: Args) -> Result<(), Error> {
    let mut config = Config::new().margins(args.margins);
    if let Some(media) = MediaType::from_code(args.media)? {
        config = config.media(media);
    }
    if let Some(filename) = args.filename.filter(|s| !s.is_empty()) {
        config = config.filename(filename);
    }
    if let Some(username) = args.username.filter(|s| !s.is_empty()) {
        config = config.username(username);
    }
    if let Some(host) = host_name() {
        config = config.computer_name(host);
    }

    let stdout = io::stdout();
    let mut job = Job::new(config, BufWriter::new(stdout.lock()));

    if args.files.is_empty() {
        let stdin = io::stdin();
        convert(&mut job, stdin.lock(), "<stdin>")?;
    } else {
        for path in &args.files {
            let file = File::open(path).map_err(|e| {
                Error::Io(io::Error::new(
                    e.kind(),
                    format!("Can't open '{}' for reading: {}", path.display(), e),
                ))
            })?;
            convert(&mut job, BufReader::new(file), &path.display().to_string())?;
        }
    }

    job.finish()?.flush()?;
    Ok(())
}

/// Print every page of one input. A bad page ends this input only.
fn convert<W: Write, R: BufRead>(job: &mut Job<W>, input: R, name: &str) -> Result<(), Error> {
    let mut reader = PnmReader::new(input);
    loop {
        match reader.next_page() {
            Ok(Some(page)) => job.print_page(&page)?,
            Ok(None) => break,
            Err(err) if err.is_input_error() => {
                warn!("{}: {}", name, err);
                break;
            }
            Err(err) => return Err(err),
        }
    }
    info!("{}: done, {} pages so far", name, job.pages());
    Ok(())
}

fn host_name() -> Option<String> {
    std::fs::read_to_string("/proc/sys/kernel/hostname")
        .ok()
        .or_else(|| std::env::var("HOSTNAME").ok())
        .map(|name| name.trim().to_string())
        .filter(|name| !name.is_empty())
}
