use formbind::Form;

#[derive(Form)]
struct Profile {
    #[form(max_len = "ten")]
    bio: String,
}

fn main() {}
