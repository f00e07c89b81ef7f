use clap::Parser;
use flowdsl::prelude::*;
use rand::Rng;
use rand::rngs::ThreadRng;
use std::fs;

/// A CLI tool to generate random, valid flow DSL text for stress testing
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Cli {
    /// Write the flows to this file instead of stdout
    #[arg(short, long)]
    output: Option<String>,

    /// Number of flows to generate, one per line
    #[arg(short, long, default_value_t = 10)]
    count: usize,

    /// Maximum combinator nesting depth
    #[arg(long, default_value_t = 3)]
    depth: usize,

    /// Maximum number of elements in any chain or branch list
    #[arg(long, default_value_t = 4)]
    width: usize,
}

/// Hands out unique node ids across one generated flow.
struct Generator<'r> {
    rng: &'r mut ThreadRng,
    max_width: usize,
    next_id: usize,
}

impl Generator<'_> {
    fn fresh_id(&mut self) -> String {
        self.next_id += 1;
        format!("n{}", self.next_id)
    }

    fn chain(&mut self, depth: usize) -> Vec<Node> {
        let len = self.rng.random_range(1..=self.max_width);
        (0..len).map(|_| self.element(depth)).collect()
    }

    fn element(&mut self, depth: usize) -> Node {
        if depth == 0 || self.rng.random_bool(0.6) {
            return Node::plain(self.fresh_id());
        }

        let id = self.fresh_id();
        match self.rng.random_range(0..3) {
            0 => {
                let body = self.chain(depth - 1);
                Node::combinator(NodeType::Iteration, id, vec![Param::from_branch(body)])
            }
            1 => {
                let branches = self.rng.random_range(1..=self.max_width);
                let params = (0..branches)
                    .map(|_| Param::from_branch(self.chain(depth - 1)))
                    .collect();
                Node::combinator(NodeType::Parallel, id, params)
            }
            _ => {
                let attempts = self.rng.random_range(1..=5);
                Node::combinator(NodeType::Retry, id, vec![Param::Count(attempts)])
            }
        }
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    if cli.width == 0 {
        eprintln!("Error: --width must be at least 1");
        std::process::exit(1);
    }

    let mut rng = rand::rng();
    let parser = FlowParser::new();
    let mut lines = Vec::with_capacity(cli.count);

    for _ in 0..cli.count {
        let mut generator = Generator {
            rng: &mut rng,
            max_width: cli.width,
            next_id: 0,
        };
        let flow = Flow::new(generator.chain(cli.depth));
        let text = flow.to_string();

        // Every generated line must parse back into the tree it came from.
        let reparsed = parser.parse(&text)?;
        if reparsed != flow {
            return Err(format!("generated flow did not round-trip: {}", text).into());
        }
        lines.push(text);
    }

    let output = lines.join("\n");
    match &cli.output {
        Some(path) => {
            fs::write(path, output + "\n")?;
            eprintln!("Generated {} flow(s) into '{}'", cli.count, path);
        }
        None => println!("{}", output),
    }

    Ok(())
}
