use hbpl::{convert_rgb, ColorMode, Config, Job, RasterBuffer};
use std::{env, fs::File, io::BufWriter};

//
// cargo run --example encode_image -- page.png page.hbpl [gray]
//
// The image is taken as a 600 dpi page; a 5100x6600 image prints on letter.
//

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::init();

    let args: Vec<String> = env::args().collect();
    if args.len() < 3 {
        eprintln!("Usage: {} <image> <output> [gray]", args[0]);
        std::process::exit(2);
    }
    let gray = args.get(3).map_or(false, |s| s == "gray");

    let image = image::open(&args[1])?;
    let page = if gray {
        let luma = image.to_luma8();
        let (width, height) = luma.dimensions();
        let ink = luma.into_raw().into_iter().map(|g| !g).collect();
        RasterBuffer::from_samples(width as usize, height as usize, ColorMode::Monochrome, ink)?
    } else {
        let rgb = image.to_rgb8();
        let (width, height) = rgb.dimensions();
        convert_rgb(width as usize, height as usize, &rgb.into_raw())?
    };

    let output = BufWriter::new(File::create(&args[2])?);
    let config = Config::new().filename(args[1].as_str()).username("demo");
    let mut job = Job::new(config, output);
    job.print_page(&page)?;
    println!(
        "wrote {} page(s), media {:?}",
        job.pages(),
        job.media().map(|m| m.pjl_name())
    );
    job.finish()?;
    Ok(())
}
