//! The `quizmill init` command.

use anyhow::Result;

pub fn execute() -> Result<()> {
    // Create example quiz
    std::fs::create_dir_all("quizzes")?;
    let quiz_path = std::path::Path::new("quizzes/example.toml");
    if quiz_path.exists() {
        println!("quizzes/example.toml already exists, skipping.");
    } else {
        std::fs::write(quiz_path, EXAMPLE_QUIZ)?;
        println!("Created quizzes/example.toml");
    }

    // Create example response script
    std::fs::create_dir_all("responses")?;
    let responses_path = std::path::Path::new("responses/example.toml");
    if responses_path.exists() {
        println!("responses/example.toml already exists, skipping.");
    } else {
        std::fs::write(responses_path, EXAMPLE_RESPONSES)?;
        println!("Created responses/example.toml");
    }

    println!("\nNext steps:");
    println!("  1. Edit quizzes/example.toml with your own questions");
    println!("  2. Run: quizmill validate --quiz quizzes/example.toml");
    println!("  3. Run: quizmill run --quiz quizzes/example.toml --responses responses/example.toml");

    Ok(())
}

const EXAMPLE_QUIZ: &str = r#"# quizmill example quiz
# One question of every kind.

[quiz]
id = "example"
version = "1.0.0"
author = "quizmill"
language = "en"
title = "Kitchen Safety"
description = "A tour of every question kind"
pass_threshold_percent = 70

[[questions]]
id = "q1"
kind = "single_choice"
prompt = "What do you throw on a grease fire?"
max_points = 10
penalty_points = 2
explanation = "Water spreads burning grease."
show_solution = true
options = ["Water", "Baking soda", "Gasoline"]
solution = "Baking soda"

[[questions]]
id = "q2"
kind = "multi_choice"
prompt = "Which of these are heat sources?"
max_points = 10
options = [
    { id = "stove", text = "Stove" },
    { id = "oven", text = "Oven" },
    { id = "fridge", text = "Fridge" },
]
solution = ["stove", "oven"]

[[questions]]
id = "q3"
kind = "image_single_choice"
prompt = "Which picture shows a smoke alarm?"
max_points = 10
options = ["alarm.png", "clock.png", "speaker.png"]
solution = "alarm.png"

[[questions]]
id = "q4"
kind = "image_multi_choice"
prompt = "Select every fire hazard"
max_points = 10
options = [
    { id = "candle", image = "candle.png" },
    { id = "toaster", image = "toaster.png" },
    { id = "sink", image = "sink.png" },
]
solution = ["candle", "toaster"]

[[questions]]
id = "q5"
kind = "hotspot"
prompt = "Click the fire extinguisher"
max_points = 10
image = "kitchen.png"

[questions.target]
x = 100.0
y = 100.0
radius = 20.0
location_id = "extinguisher"

[[questions]]
id = "q6"
kind = "multi_hotspot"
prompt = "Mark both exits"
max_points = 10
image = "floorplan.png"
points = [
    { id = "door_front", x = 10.0, y = 50.0 },
    { id = "door_back", x = 200.0, y = 50.0 },
    { id = "window", x = 100.0, y = 10.0 },
]
solution = ["door_front", "door_back"]

[[questions]]
id = "q7"
kind = "ordering"
prompt = "Order the steps for using an extinguisher"
max_points = 10
options = [
    { id = "pull", text = "Pull the pin" },
    { id = "aim", text = "Aim at the base" },
    { id = "squeeze", text = "Squeeze the handle" },
    { id = "sweep", text = "Sweep side to side" },
]
solution = ["pull", "aim", "squeeze", "sweep"]

[[questions]]
id = "q8"
kind = "pairing"
prompt = "Match each fire class to its extinguisher"
max_points = 10
left = [
    { id = "class_a", text = "Class A" },
    { id = "class_b", text = "Class B" },
    { id = "class_c", text = "Class C" },
]
right = [
    { id = "water", text = "Water" },
    { id = "foam", text = "Foam" },
    { id = "co2", text = "CO2" },
]
pairs = [
    { left = "class_a", right = "water" },
    { left = "class_b", right = "foam" },
    { left = "class_c", right = "co2" },
]

[[questions]]
id = "q9"
kind = "placement"
prompt = "Drag each item to the right bin"
max_points = 10
items = [
    { id = "battery", label = "Battery", zone = "hazardous" },
    { id = "paper", label = "Paper", zone = "recycling" },
    { id = "peel", label = "Banana peel", zone = "compost" },
]
"#;

const EXAMPLE_RESPONSES: &str = r#"# quizmill example response script
# One scripted answer per question; delete a block to skip a question.

[[answers]]
question = "q1"
response = { type = "selected", option_id = "opt_2" }

[[answers]]
question = "q2"
response = { type = "selected_many", option_ids = ["stove", "oven"] }

[[answers]]
question = "q3"
response = { type = "selected", option_id = "opt_1" }

[[answers]]
question = "q4"
response = { type = "selected_many", option_ids = ["candle", "toaster"] }

[[answers]]
question = "q5"
response = { type = "click", x = 105.0, y = 95.0 }

[[answers]]
question = "q6"
response = { type = "selected_points", point_ids = ["door_front", "door_back"] }

[[answers]]
question = "q7"
response = { type = "arrangement", option_ids = ["pull", "aim", "squeeze", "sweep"] }

[[answers]]
question = "q8"
response = { type = "pairs", pairs = [
    { left = "class_a", right = "water" },
    { left = "class_b", right = "foam" },
    { left = "class_c", right = "co2" },
] }

[[answers]]
question = "q9"
response = { type = "placements", placements = { battery = "hazardous", paper = "recycling", peel = "compost" } }
"#;
