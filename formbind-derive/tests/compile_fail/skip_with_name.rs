use formbind::Form;

#[derive(Form)]
struct Login {
    #[form(skip, name = "pwd")]
    password: String,
}

fn main() {}
