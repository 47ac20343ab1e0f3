use crate::tokenize::Tokenizer;

/// Gloss-overlap score between a signature and a context.
///
/// Every signature token found anywhere in the context adds one, so a word
/// repeated in the signature counts once per repetition while repetitions in
/// the context add nothing.
pub fn overlap(tokenizer: &Tokenizer, signature: &str, context: &str) -> usize {
    overlap_tokens(&tokenizer.tokenize(signature), &tokenizer.tokenize(context))
}

/// [`overlap`] over already tokenized inputs.
pub fn overlap_tokens<S, C>(signature: &[S], context: &[C]) -> usize
where
    S: AsRef<str>,
    C: AsRef<str>,
{
    signature
        .iter()
        .filter(|sig| context.iter().any(|ctx| ctx.as_ref() == sig.as_ref()))
        .count()
}
