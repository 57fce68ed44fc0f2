use formbind::{DateTs, Form, UploadedFile};

#[derive(Default, Form)]
struct Everything {
    #[form(
        name = "nick",
        label = "Nickname",
        widget = "text",
        required = "true",
        regex = "^[a-z]+$",
        min_len = "1",
        max_len = 32,
        len = "1 32"
    )]
    nick_name: String,
    #[form(min_num = -10, max_num = "10", num = "-10 10", required = false)]
    offset: i8,
    #[form(format = "%d/%m/%Y")]
    birthday: Option<chrono::NaiveDate>,
    joined: DateTs,
    attachments: Vec<UploadedFile>,
    #[form(name = "-")]
    cache: Vec<std::cell::RefCell<u8>>,
    r#type: String,
}

fn main() {
    let fields = <Everything as Form>::FIELDS;
    assert_eq!(fields.len(), 7);
    assert_eq!(fields[6].ident, "type");
}
