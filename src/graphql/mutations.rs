pub const CREATE_USER_MUTATION: &str = r"
  mutation CreateUser($input: CreateUserInput!) {
    createUser(input: $input) {
      id
      email
      firstName
      lastName
      firebaseId
      role
    }
  }
";
