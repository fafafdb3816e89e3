use chartgrey::{Algorithm, Engine, EngineConfig, Outcome};

const USAGE: &str = "usage: chartgrey [--cyk | --algorithm NAME] [--json] [--lenient] <grammar-file> [input words...]";

struct Args {
    config: EngineConfig,
    json: bool,
    grammar_file: String,
    input: Vec<String>,
}

fn parse_args(mut args: impl Iterator<Item = String>) -> Result<Args, String> {
    let mut config = EngineConfig::default();
    let mut json = false;
    let mut grammar_file = None;
    let mut input = Vec::new();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--cyk" => config.algorithm = Algorithm::Cyk,
            "--algorithm" => {
                let name = args.next().ok_or("--algorithm needs a name")?;
                config.algorithm = name.parse().map_err(|e| format!("{}", e))?;
            }
            "--json" => json = true,
            "--lenient" => config.lenient = true,
            "-h" | "--help" => return Err(USAGE.to_string()),
            flag if flag.starts_with("--") => return Err(format!("unknown flag {}\n{}", flag, USAGE)),
            _ if grammar_file.is_none() => grammar_file = Some(arg),
            _ => input.push(arg),
        }
    }
    let grammar_file = grammar_file.ok_or(USAGE)?;
    Ok(Args { config, json, grammar_file, input })
}

fn report(outcome: &Outcome, json: bool) -> Result<(), String> {
    if json {
        let out = serde_json::to_string_pretty(outcome).map_err(|e| e.to_string())?;
        println!("{}", out);
    } else {
        print!("{}", outcome);
    }
    Ok(())
}

fn main() -> Result<(), String> {
    env_logger::init();
    let args = parse_args(std::env::args().skip(1))?;
    let bnf = std::fs::read_to_string(&args.grammar_file)
        .map_err(|e| format!("{}: {}", args.grammar_file, e))?;
    let engine = Engine::new(args.config);

    if !args.input.is_empty() {
        match engine.run(&bnf, &args.input.join(" ")) {
            Err(e) => println!("Parse err: {}", e),
            Ok(outcome) => report(&outcome, args.json)?,
        }
        return Ok(());
    }

    use rustyline::error::ReadlineError;
    let mut rl = rustyline::DefaultEditor::new().map_err(|e| e.to_string())?;
    loop {
        match rl.readline("~> ") {
            Err(ReadlineError::Interrupted) | Err(ReadlineError::Eof) => return Ok(()),
            Err(e) => return Err(format!("Readline err: {:?}", e)),
            Ok(line) => match engine.run(&bnf, &line) {
                Err(e) => println!("Parse err: {}", e),
                Ok(outcome) => {
                    let _ = rl.add_history_entry(&line);
                    report(&outcome, args.json)?;
                }
            },
        }
    }
}
