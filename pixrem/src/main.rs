use clap::Parser;
use pixrem_lib::Options;
use std::fs;

#[derive(Parser)]
#[command(name = "pixrem")]
#[command(about = "Generate pixel fallbacks for rem units in CSS")]
struct Args {
    /// Input CSS file.
    input: String,

    /// Output CSS file.
    output: String,

    /// Root font-size expression used when the stylesheet does not define one.
    #[arg(long, default_value = "16")]
    root_value: String,

    /// Target browsers, browserslist-style.
    #[arg(long, default_value = "ie <= 8")]
    browsers: String,

    /// Overwrite rem values in place instead of inserting fallbacks.
    #[arg(long)]
    replace: bool,

    /// Also convert declarations inside at-rules.
    #[arg(long)]
    atrules: bool,

    /// Disable root font-size detection from html/:root rules.
    #[arg(long)]
    no_html: bool,

    /// Decimal digits kept when rounding converted values.
    #[arg(long, default_value_t = 3)]
    precision: i32,
}

fn main() {
    env_logger::init();

    let args: Args = Args::parse();
    let options = Options {
        root_value: args.root_value,
        replace: args.replace,
        atrules: args.atrules,
        html: !args.no_html,
        unit_precision: args.precision,
        browsers: args.browsers,
    };

    match fs::read_to_string(&args.input) {
        Ok(css) => match pixrem_lib::process(&css, &options) {
            Ok(result) => {
                for warning in &result.warnings {
                    eprintln!("{}: {}", warning.plugin, warning.message);
                }
                if let Err(e) = fs::write(&args.output, result.css) {
                    eprintln!("Error writing CSS file: {}", e);
                    std::process::exit(1);
                }
                println!("Wrote {}", args.output);
            }
            Err(e) => {
                eprintln!("Error processing CSS: {}", e);
                std::process::exit(1);
            }
        },
        Err(e) => {
            eprintln!("Error reading CSS file: {}", e);
            std::process::exit(1);
        }
    }
}
