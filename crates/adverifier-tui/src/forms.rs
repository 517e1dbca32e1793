//! Login and registration form state.
//!
//! Forms only check what can be checked locally (required fields, password
//! confirmation). Everything else is the backend's call.

// ============================================================================
// Constants
// ============================================================================

/// Maximum length for username input (Django's default username limit).
const MAX_USERNAME_LENGTH: usize = 150;

/// Maximum length for email input.
const MAX_EMAIL_LENGTH: usize = 254;

/// Maximum length for password input.
/// 128 chars accommodates password managers and passphrases.
const MAX_PASSWORD_LENGTH: usize = 128;

/// Maximum length for a chat message typed in the terminal.
const MAX_MESSAGE_LENGTH: usize = 4000;

pub const MISSING_LOGIN_FIELDS: &str = "Please enter both username and password";
pub const MISSING_REGISTER_FIELDS: &str = "Please fill in all fields";
pub const PASSWORD_MISMATCH: &str = "Passwords do not match";

/// Login form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoginFocus {
    Username,
    Password,
    Button,
    RegisterLink,
}

impl LoginFocus {
    pub fn next(&self) -> Self {
        match self {
            LoginFocus::Username => LoginFocus::Password,
            LoginFocus::Password => LoginFocus::Button,
            LoginFocus::Button => LoginFocus::RegisterLink,
            LoginFocus::RegisterLink => LoginFocus::Username,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            LoginFocus::Username => LoginFocus::RegisterLink,
            LoginFocus::Password => LoginFocus::Username,
            LoginFocus::Button => LoginFocus::Password,
            LoginFocus::RegisterLink => LoginFocus::Button,
        }
    }
}

/// Register form focus state
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegisterFocus {
    Username,
    Email,
    Password,
    Confirm,
    Button,
    LoginLink,
}

impl RegisterFocus {
    pub fn next(&self) -> Self {
        match self {
            RegisterFocus::Username => RegisterFocus::Email,
            RegisterFocus::Email => RegisterFocus::Password,
            RegisterFocus::Password => RegisterFocus::Confirm,
            RegisterFocus::Confirm => RegisterFocus::Button,
            RegisterFocus::Button => RegisterFocus::LoginLink,
            RegisterFocus::LoginLink => RegisterFocus::Username,
        }
    }

    pub fn prev(&self) -> Self {
        match self {
            RegisterFocus::Username => RegisterFocus::LoginLink,
            RegisterFocus::Email => RegisterFocus::Username,
            RegisterFocus::Password => RegisterFocus::Email,
            RegisterFocus::Confirm => RegisterFocus::Password,
            RegisterFocus::Button => RegisterFocus::Confirm,
            RegisterFocus::LoginLink => RegisterFocus::Button,
        }
    }
}

#[derive(Debug, Clone)]
pub struct LoginForm {
    pub username: String,
    pub password: String,
    pub focus: LoginFocus,
    pub error: Option<String>,
}

impl LoginForm {
    pub fn new(username: String) -> Self {
        let focus = if username.is_empty() {
            LoginFocus::Username
        } else {
            LoginFocus::Password
        };
        Self {
            username,
            password: String::new(),
            focus,
            error: None,
        }
    }

    pub fn validate(&self) -> Result<(), &'static str> {
        validate_login(&self.username, &self.password)
    }

    /// Field under the cursor, if the focus is on a text field.
    pub fn focused_field(&mut self) -> Option<(&mut String, FieldKind)> {
        match self.focus {
            LoginFocus::Username => Some((&mut self.username, FieldKind::Username)),
            LoginFocus::Password => Some((&mut self.password, FieldKind::Password)),
            LoginFocus::Button | LoginFocus::RegisterLink => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct RegisterForm {
    pub username: String,
    pub email: String,
    pub password: String,
    pub confirm_password: String,
    pub focus: RegisterFocus,
    pub error: Option<String>,
}

impl Default for RegisterForm {
    fn default() -> Self {
        Self {
            username: String::new(),
            email: String::new(),
            password: String::new(),
            confirm_password: String::new(),
            focus: RegisterFocus::Username,
            error: None,
        }
    }
}

impl RegisterForm {
    pub fn validate(&self) -> Result<(), &'static str> {
        validate_registration(&self.username, &self.email, &self.password, &self.confirm_password)
    }

    pub fn focused_field(&mut self) -> Option<(&mut String, FieldKind)> {
        match self.focus {
            RegisterFocus::Username => Some((&mut self.username, FieldKind::Username)),
            RegisterFocus::Email => Some((&mut self.email, FieldKind::Email)),
            RegisterFocus::Password => Some((&mut self.password, FieldKind::Password)),
            RegisterFocus::Confirm => Some((&mut self.confirm_password, FieldKind::Password)),
            RegisterFocus::Button | RegisterFocus::LoginLink => None,
        }
    }
}

/// Kind of text field, for length limits and masking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    Username,
    Email,
    Password,
    Message,
}

impl FieldKind {
    fn max_len(&self) -> usize {
        match self {
            FieldKind::Username => MAX_USERNAME_LENGTH,
            FieldKind::Email => MAX_EMAIL_LENGTH,
            FieldKind::Password => MAX_PASSWORD_LENGTH,
            FieldKind::Message => MAX_MESSAGE_LENGTH,
        }
    }

    pub fn is_masked(&self) -> bool {
        matches!(self, FieldKind::Password)
    }
}

pub fn validate_login(username: &str, password: &str) -> Result<(), &'static str> {
    if username.is_empty() || password.is_empty() {
        return Err(MISSING_LOGIN_FIELDS);
    }
    Ok(())
}

pub fn validate_registration(
    username: &str,
    email: &str,
    password: &str,
    confirm_password: &str,
) -> Result<(), &'static str> {
    if username.is_empty() || email.is_empty() || password.is_empty() || confirm_password.is_empty() {
        return Err(MISSING_REGISTER_FIELDS);
    }
    if password != confirm_password {
        return Err(PASSWORD_MISMATCH);
    }
    Ok(())
}

// ============================================================================
// Input validation helpers
// ============================================================================

/// Check if a character is valid for input (no control characters)
fn is_valid_input_char(c: char) -> bool {
    !c.is_control()
}

/// Check if a character should be accepted into a field of the given kind
pub fn can_add_char(kind: FieldKind, current: &str, c: char) -> bool {
    current.chars().count() < kind.max_len() && is_valid_input_char(c)
}

/// Push a character into a field if it passes validation.
pub fn push_char(field: &mut String, kind: FieldKind, c: char) {
    if can_add_char(kind, field, c) {
        field.push(c);
    }
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_validate_login() {
        assert_eq!(validate_login("", "pw"), Err(MISSING_LOGIN_FIELDS));
        assert_eq!(validate_login("alice", ""), Err(MISSING_LOGIN_FIELDS));
        assert_eq!(validate_login("alice", "pw"), Ok(()));
    }

    #[test]
    fn test_validate_registration() {
        assert_eq!(
            validate_registration("alice", "", "pw", "pw"),
            Err(MISSING_REGISTER_FIELDS)
        );
        assert_eq!(
            validate_registration("alice", "a@x.com", "pw", "pw2"),
            Err(PASSWORD_MISMATCH)
        );
        assert_eq!(validate_registration("alice", "a@x.com", "pw", "pw"), Ok(()));
    }

    #[test]
    fn test_missing_fields_reported_before_mismatch() {
        assert_eq!(
            validate_registration("", "a@x.com", "pw", "other"),
            Err(MISSING_REGISTER_FIELDS)
        );
    }

    #[test]
    fn test_login_form_focus() {
        assert_eq!(LoginForm::new(String::new()).focus, LoginFocus::Username);
        assert_eq!(LoginForm::new("alice".to_string()).focus, LoginFocus::Password);

        let mut focus = LoginFocus::Username;
        for _ in 0..4 {
            focus = focus.next();
        }
        assert_eq!(focus, LoginFocus::Username);
        assert_eq!(LoginFocus::Username.prev(), LoginFocus::RegisterLink);
    }

    #[test]
    fn test_register_focus_cycle() {
        let mut focus = RegisterFocus::Username;
        for _ in 0..6 {
            focus = focus.next();
        }
        assert_eq!(focus, RegisterFocus::Username);
        assert_eq!(RegisterFocus::Button.prev(), RegisterFocus::Confirm);
    }

    #[test]
    fn test_focused_field() {
        let mut form = RegisterForm {
            focus: RegisterFocus::Confirm,
            ..Default::default()
        };
        let (field, kind) = form.focused_field().unwrap();
        push_char(field, kind, 'x');
        assert_eq!(form.confirm_password, "x");

        form.focus = RegisterFocus::Button;
        assert!(form.focused_field().is_none());
    }

    #[test]
    fn test_can_add_char() {
        assert!(can_add_char(FieldKind::Password, "", 'a'));
        assert!(can_add_char(FieldKind::Password, &"a".repeat(127), '!'));
        assert!(!can_add_char(FieldKind::Password, &"a".repeat(128), 'a'));
        assert!(!can_add_char(FieldKind::Username, "", '\x00'));
        assert!(!can_add_char(FieldKind::Username, "", '\n'));
        assert!(!can_add_char(FieldKind::Message, "", '\t'));
        assert!(can_add_char(FieldKind::Message, "héllo", 'ö'));
    }

    #[test]
    fn test_masking() {
        assert!(FieldKind::Password.is_masked());
        assert!(!FieldKind::Email.is_masked());
    }
}
