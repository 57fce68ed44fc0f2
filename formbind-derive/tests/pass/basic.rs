use formbind::{read_form, Form, FormInput};

#[derive(Default, Form)]
struct Login {
    #[form(label = "Account", required, min_len = 3)]
    account: String,
    #[form(required, regex = "^[0-9a-zA-Z]{6,}$")]
    password: String,
    remember_me: bool,
}

fn main() {
    let mut login = Login::default();
    let input = FormInput::from_urlencoded("account=root&password=secret1&remember_me=on");
    read_form(&input, &mut login).unwrap();
    assert!(login.remember_me);
}
