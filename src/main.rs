use feedline::app::Command;

fn main() {
    let command = match parse_args() {
        Ok(Some(command)) => command,
        Ok(None) => return,
        Err(message) => {
            eprintln!("error: {message}");
            std::process::exit(2);
        }
    };

    if let Err(err) = feedline::run(command) {
        eprintln!("error: {err:?}");
        std::process::exit(1);
    }
}

fn parse_args() -> Result<Option<Command>, String> {
    let mut args = std::env::args().skip(1);
    let Some(first) = args.next() else {
        return Ok(Some(Command::WhoAmI));
    };
    match first.as_str() {
        "--version" | "-V" => {
            println!("Feedline {}", feedline::VERSION);
            Ok(None)
        }
        "--help" | "-h" => {
            println!(
                "Feedline - session and feed client.\n\n  whoami               Show the signed-in identity (default)\n  feed [PAGES]         Print the first PAGES pages of the feed\n  --version, -V        Show version and exit\n  --help,    -h        Show this help message\n\nSigns in with FEEDLINE_AUTH__USERNAME / FEEDLINE_AUTH__PASSWORD (or auth: in config.yaml) when no session is active."
            );
            Ok(None)
        }
        "whoami" => Ok(Some(Command::WhoAmI)),
        "feed" => {
            let pages = match args.next() {
                Some(raw) => raw
                    .parse::<usize>()
                    .map_err(|_| format!("invalid page count: {raw}"))?,
                None => 1,
            };
            Ok(Some(Command::Feed { pages }))
        }
        other => Err(format!("unknown argument: {other}")),
    }
}
