//! # Snagio Report CLI
//!
//! Usage:
//!   snagio-report input.json
//!   snagio-report input.json -o report.pdf --detailed
//!   cat input.json | snagio-report --category cat-1
//!   snagio-report --example > report.json

use std::env;
use std::fs;
use std::io::{self, Read};

use snagio_report::{LayoutVariant, RenderOptions};

fn main() {
    env_logger::init();

    let args: Vec<String> = env::args().collect();

    if args.iter().any(|a| a == "--example") {
        print!("{}", example_report_json());
        return;
    }

    let input = if args.len() > 1 && !args[1].starts_with('-') {
        fs::read_to_string(&args[1]).expect("Failed to read input file")
    } else {
        let mut buf = String::new();
        io::stdin()
            .read_to_string(&mut buf)
            .expect("Failed to read stdin");
        buf
    };

    let mut options = RenderOptions::default();
    if args.iter().any(|a| a == "--detailed") {
        options.variant = LayoutVariant::Detailed;
    }
    if let Some(w) = args.windows(2).find(|w| w[0] == "--category") {
        options.category_id = Some(w[1].clone());
    }

    let output_path = args.windows(2).find(|w| w[0] == "-o").map(|w| w[1].clone());

    match snagio_report::render_json(&input, &options) {
        Ok(output) => {
            let path = output_path.unwrap_or(output.filename);
            fs::write(&path, &output.bytes).expect("Failed to write PDF");
            eprintln!("✓ Written {} bytes to {}", output.bytes.len(), path);
        }
        Err(e) => {
            eprintln!("✗ {}", e);
            std::process::exit(1);
        }
    }
}

fn example_report_json() -> &'static str {
    r##"{
  "project": { "id": "prj-1", "name": "Harbour View Block B" },
  "labels": { "itemLabel": "Snag" },
  "categories": [
    {
      "id": "cat-1",
      "name": "Kitchen",
      "items": [
        {
          "number": 1,
          "location": "North wall, above counter",
          "description": "Cracked tile near the window frame. The crack runs diagonally across two tiles.",
          "solution": "Replace both tiles and re-grout",
          "status": "OPEN",
          "priority": "HIGH",
          "dueDate": "2026-09-15",
          "assignee": { "firstName": "Jo", "lastName": "Nilsen" },
          "photos": [
            { "url": "https://example.com/photos/tile-crack.jpg", "caption": "Crack detail" }
          ]
        },
        {
          "number": 2,
          "location": "Ceiling",
          "description": "Paint blistering around the extraction unit.",
          "status": "IN_PROGRESS",
          "priority": "MEDIUM",
          "photos": []
        }
      ]
    },
    {
      "id": "cat-2",
      "name": "Bathroom",
      "items": [
        {
          "number": 1,
          "location": "Shower enclosure",
          "description": "Silicone seal incomplete along the base profile.",
          "solution": "Re-seal full perimeter",
          "status": "PENDING_REVIEW",
          "priority": "CRITICAL",
          "photos": [
            { "url": "https://example.com/photos/seal-1.jpg" },
            { "url": "https://example.com/photos/seal-2.jpg", "caption": "After first fix" }
          ]
        }
      ]
    }
  ]
}"##
}
