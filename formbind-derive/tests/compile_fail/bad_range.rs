use formbind::Form;

#[derive(Form)]
struct Settings {
    #[form(num = "5")]
    level: i32,
}

fn main() {}
