use formbind::Form;

#[derive(Form)]
struct Theme {
    #[form(colour = "red")]
    accent: String,
}

fn main() {}
