use clap::Parser;
use crace::{Pos, Race};
use mazerace::{
    app::{headless, App, AppError},
    logging,
    settings::Settings,
};

#[derive(Parser, Debug)]
#[clap(version, author, about, name = "mazerace")]
struct Args {
    #[clap(long, help = "Maze height in cells")]
    rows: Option<usize>,
    #[clap(long, help = "Maze width in cells")]
    cols: Option<usize>,
    #[clap(long, value_parser = parse_pos, help = "Start cell as ROW,COL")]
    start: Option<Pos>,
    #[clap(long, value_parser = parse_pos, help = "Goal cell as ROW,COL")]
    end: Option<Pos>,
    #[clap(long, help = "Milliseconds between two steps of a search")]
    delay_ms: Option<u64>,
    #[clap(long, help = "Seed for the maze generator")]
    seed: Option<u64>,
    #[clap(long, action, help = "Race once without animation and print the results")]
    headless: bool,
    #[clap(long, action, help = "Show debug messages from the start")]
    debug: bool,
    #[clap(short, long, action, help = "Reset config to default and quit")]
    reset_config: bool,
    #[clap(short, long, action, help = "Show config path and quit")]
    show_config_path: bool,
    #[clap(long, help = "Show config in debug format and quit")]
    debug_config: bool,
}

fn parse_pos(value: &str) -> Result<Pos, String> {
    let (row, col) = value
        .split_once(',')
        .ok_or_else(|| format!("expected ROW,COL, got {:?}", value))?;
    let parse = |part: &str| part.trim().parse::<i32>().map_err(|err| err.to_string());
    Ok(Pos(parse(row)?, parse(col)?))
}

fn main() -> Result<(), AppError> {
    let args = Args::parse();

    if args.reset_config {
        Settings::reset_config(Settings::default_path())?;
        return Ok(());
    }

    if args.show_config_path {
        let settings_path = Settings::default_path();
        if let Some(s) = settings_path.to_str() {
            println!("{}", s);
        } else {
            println!("{:?}", settings_path);
        }
        return Ok(());
    }

    if args.debug_config {
        println!("{:#?}", Settings::load(Settings::default_path()));
        return Ok(());
    }

    logging::init();
    if args.debug {
        logging::get_logger().switch_debug();
    }

    let mut settings = Settings::load(Settings::default_path());
    if let Some(rows) = args.rows {
        settings = settings.set_rows(rows);
    }
    if let Some(cols) = args.cols {
        settings = settings.set_cols(cols);
    }
    if let Some(start) = args.start {
        settings = settings.set_start(start);
    }
    if let Some(end) = args.end {
        settings = settings.set_end(end);
    }
    if let Some(delay) = args.delay_ms {
        settings = settings.set_step_delay_ms(delay);
    }
    if let Some(seed) = args.seed {
        settings = settings.set_seed(seed);
    }

    let race = Race::new(settings.race_config())?;

    if args.headless {
        let result = headless::run(race);
        for message in logging::get_logger().drain() {
            eprintln!("{:<5} [{}] {}", message.level, message.tag, message.text);
        }
        return result;
    }

    better_panic::install();

    App::new(race, settings)?.run()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn positions_parse() {
        assert_eq!(parse_pos("3,4"), Ok(Pos(3, 4)));
        assert_eq!(parse_pos(" 7 , 14 "), Ok(Pos(7, 14)));
        assert!(parse_pos("3").is_err());
        assert!(parse_pos("a,1").is_err());
    }

    #[test]
    fn args_parse() {
        let args = Args::parse_from(["mazerace", "--rows", "21", "--end", "20,40", "--headless"]);
        assert_eq!(args.rows, Some(21));
        assert_eq!(args.end, Some(Pos(20, 40)));
        assert!(args.headless);
    }
}
