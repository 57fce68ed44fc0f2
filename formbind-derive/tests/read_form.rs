use chrono::{NaiveDate, NaiveDateTime};
use formbind::{
    metadata, read_file_form, read_form, BindError, DateTs, Form, FormInput, Rule, UploadedFile,
};

// -----------------------------------------------------------------------------
// Scalars and sequences
// -----------------------------------------------------------------------------
#[derive(Debug, Default, Form)]
struct Pair {
    a: i64,
    b: String,
}

#[test]
fn binds_scalars_by_snake_case_name() {
    let mut form = Pair::default();
    read_form(&FormInput::from_urlencoded("a=1&b=2"), &mut form).unwrap();
    assert_eq!(form.a, 1);
    assert_eq!(form.b, "2");
}

#[derive(Debug, Default, Form)]
struct Lists {
    a: Vec<i32>,
    b: Vec<i32>,
}

#[test]
fn binds_sequences_with_bracket_fallback() {
    let mut form = Lists::default();
    read_form(
        &FormInput::from_urlencoded("a=1&a=2&b[]=3&b[]=4"),
        &mut form,
    )
    .unwrap();
    assert_eq!(form.a, vec![1, 2]);
    assert_eq!(form.b, vec![3, 4]);
}

#[test]
fn bare_key_wins_over_bracketed() {
    let mut form = Lists::default();
    read_form(&FormInput::from_urlencoded("a[]=9&a=1"), &mut form).unwrap();
    assert_eq!(form.a, vec![1]);
}

#[derive(Debug, Default, Form)]
struct Profile {
    #[form(label = "User")]
    user_name: String,
    nick: Option<String>,
    age: u32,
}

#[test]
fn absent_keys_leave_defaults() {
    let mut form = Profile {
        age: 7,
        ..Profile::default()
    };
    read_form(&FormInput::from_urlencoded("user_name=ada"), &mut form).unwrap();
    assert_eq!(form.user_name, "ada");
    assert_eq!(form.nick, None);
    assert_eq!(form.age, 7);
}

#[test]
fn option_fields_allocate_on_value() {
    let mut form = Profile::default();
    read_form(&FormInput::from_urlencoded("nick=al"), &mut form).unwrap();
    assert_eq!(form.nick.as_deref(), Some("al"));
}

#[test]
fn only_first_scalar_value_is_used() {
    let mut form = Profile::default();
    read_form(&FormInput::from_urlencoded("age=3&age=4"), &mut form).unwrap();
    assert_eq!(form.age, 3);
}

// -----------------------------------------------------------------------------
// Validation
// -----------------------------------------------------------------------------
#[derive(Debug, Default, Form)]
struct Account {
    #[form(label = "Email", required, regex = r"^[^@\s]+@[^@\s]+$")]
    email: String,
    #[form(label = "Level", num = "1 10")]
    level: i32,
    #[form(label = "Bio", max_len = 5)]
    bio: String,
}

#[test]
fn missing_required_field_is_rejected() {
    let err = read_form(&FormInput::from_urlencoded("level=2"), &mut Account::default())
        .unwrap_err();
    let msg = err.to_string();
    assert!(msg.contains("Email"));
    assert!(msg.contains("required"));
    assert_eq!(err.field(), Some("email"));
}

#[test]
fn numeric_range_rejects_out_of_bounds() {
    let mut form = Account::default();
    let err = read_form(
        &FormInput::from_urlencoded("email=a@b&level=15"),
        &mut form,
    )
    .unwrap_err();
    assert!(matches!(err, BindError::Rejected { ref field, .. } if field == "level"));
    assert_eq!(form.level, 0);

    read_form(&FormInput::from_urlencoded("email=a@b&level=5"), &mut form).unwrap();
    assert_eq!(form.level, 5);
}

#[test]
fn first_failure_stops_the_read() {
    let mut form = Account::default();
    let err = read_form(
        &FormInput::from_urlencoded("email=a@b&level=0&bio=toolong"),
        &mut form,
    )
    .unwrap_err();
    assert_eq!(err.field(), Some("level"));
    assert_eq!(form.email, "a@b");
    assert!(form.bio.is_empty());
}

#[test]
fn lengths_count_bytes() {
    let mut form = Account::default();
    read_form(
        &FormInput::from_urlencoded("email=a@b&level=1&bio=%E4%BD%A0"),
        &mut form,
    )
    .unwrap();
    assert_eq!(form.bio, "你");

    // Two CJK characters are six bytes, over the limit of five.
    let err = read_form(
        &FormInput::from_urlencoded("email=a@b&level=1&bio=%E4%BD%A0%E5%A5%BD"),
        &mut Account::default(),
    )
    .unwrap_err();
    assert_eq!(err.to_string(), "Bio（too long (at most 5 bytes)）");
}

#[test]
fn unparsable_value_is_a_coercion_error() {
    let err = read_form(&FormInput::from_urlencoded("a=x"), &mut Pair::default()).unwrap_err();
    assert!(matches!(err, BindError::Coerce { .. }));
    assert!(err.to_string().starts_with("a（"));
}

// -----------------------------------------------------------------------------
// Exclusion and renaming
// -----------------------------------------------------------------------------
#[derive(Debug, Default, Form)]
struct Renamed {
    #[form(name = "q")]
    query: String,
    #[form(skip)]
    secret: String,
    #[form(name = "-")]
    hidden: String,
}

#[test]
fn excluded_fields_are_never_bound() {
    let mut form = Renamed::default();
    read_form(
        &FormInput::from_urlencoded("q=rust&query=no&secret=x&hidden=y&-=z"),
        &mut form,
    )
    .unwrap();
    assert_eq!(form.query, "rust");
    assert!(form.secret.is_empty());
    assert!(form.hidden.is_empty());
}

#[test]
fn metadata_reflects_annotations() {
    let meta = metadata::<Account>().unwrap();
    assert_eq!(meta.len(), 3);
    assert_eq!(meta[0].label, "Email");
    let rules: Vec<&Rule> = meta[0].validators.iter().map(|v| v.rule()).collect();
    assert_eq!(rules[0], &Rule::Required);
    assert!(matches!(rules[1], Rule::Regex { .. }));
    assert_eq!(
        meta[1].validators[0].rule(),
        &Rule::NumberRange { min: 1, max: 10 }
    );

    let renamed = metadata::<Renamed>().unwrap();
    assert!(renamed[1].is_excluded());
    assert!(renamed[2].is_excluded());
    assert_eq!(renamed[0].widget, "textbox");
}

// -----------------------------------------------------------------------------
// Temporal values
// -----------------------------------------------------------------------------
#[derive(Debug, Default, Form)]
struct Event {
    day: DateTs,
    #[form(format = "%d/%m/%Y")]
    local_day: Option<NaiveDate>,
    starts_at: Option<NaiveDateTime>,
    flag: bool,
}

#[test]
fn binds_dates_and_times() {
    let mut form = Event::default();
    read_form(
        &FormInput::from_urlencoded(
            "day=2024-03-01&local_day=02/01/2023&starts_at=2023-01-02+08:30:00&flag=yes",
        ),
        &mut form,
    )
    .unwrap();
    assert_eq!(form.day, DateTs(1_709_251_200));
    assert_eq!(form.local_day, NaiveDate::from_ymd_opt(2023, 1, 2));
    assert_eq!(
        form.starts_at.map(|t| t.to_string()),
        Some("2023-01-02 08:30:00".to_string())
    );
    assert!(form.flag);
}

#[test]
fn malformed_date_is_rejected() {
    let err = read_form(&FormInput::from_urlencoded("day=01-03-2024"), &mut Event::default())
        .unwrap_err();
    assert!(matches!(err, BindError::Coerce { ref field, .. } if field == "day"));
}

// -----------------------------------------------------------------------------
// File uploads
// -----------------------------------------------------------------------------
#[derive(Debug, Default, Form)]
struct Upload {
    avatar: Vec<UploadedFile>,
    docs: Vec<UploadedFile>,
}

#[test]
fn binds_uploaded_files() {
    let mut input = FormInput::new()
        .with_file("avatar", UploadedFile::new("me.png", Some("image/png"), b"png".to_vec()))
        .with_file("docs[]", UploadedFile::new("a.txt", None, b"a".to_vec()))
        .with_file("docs[]", UploadedFile::new("b.txt", None, b"b".to_vec()));
    let mut form = Upload::default();
    read_file_form(&mut input, &mut form).unwrap();
    assert_eq!(form.avatar.len(), 1);
    assert_eq!(form.avatar[0].content_type.as_deref(), Some("image/png"));
    let names: Vec<&str> = form.docs.iter().map(|f| f.filename.as_str()).collect();
    assert_eq!(names, ["a.txt", "b.txt"]);
}

#[test]
fn binds_files_from_multipart_body() {
    let body = concat!(
        "--XyZ\r\n",
        "Content-Disposition: form-data; name=\"avatar\"; filename=\"x.bin\"\r\n",
        "Content-Type: application/octet-stream\r\n",
        "\r\n",
        "abc\r\n",
        "--XyZ--\r\n",
    );
    let mut input = FormInput::new()
        .with_multipart_body("multipart/form-data; boundary=XyZ", body)
        .unwrap();
    let mut form = Upload::default();
    read_file_form(&mut input, &mut form).unwrap();
    assert_eq!(form.avatar[0].data(), b"abc");
    assert!(form.docs.is_empty());
}

#[test]
fn missing_upload_is_reported() {
    let err = read_file_form(&mut FormInput::new(), &mut Upload::default()).unwrap_err();
    assert_eq!(err, BindError::NoFileUpload);
    assert_eq!(err.to_string(), "no file upload");
}

#[derive(Debug, Default, Form)]
struct WrongUpload {
    avatar: Vec<String>,
}

#[test]
fn non_file_sequence_cannot_take_uploads() {
    let mut input = FormInput::new().with_file("avatar", UploadedFile::default());
    let err = read_file_form(&mut input, &mut WrongUpload::default()).unwrap_err();
    assert!(err.is_config());
}
