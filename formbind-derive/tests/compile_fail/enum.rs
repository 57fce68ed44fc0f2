use formbind::Form;

#[derive(Form)]
enum Choice {
    Yes,
    No,
}

fn main() {}
